//! Metrics collection module
//!
//! Tracks per-operation call counts, error rates, and response times.
//! Nothing here feeds back into query results.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

/// Response times kept per operation
const RESPONSE_TIME_WINDOW: usize = 100;

/// Process-wide operation metrics
pub struct Metrics {
    /// Total operations started
    total_queries: AtomicU64,
    /// Calls per operation
    calls: RwLock<HashMap<String, u64>>,
    /// Recent response times in ms
    response_times: RwLock<HashMap<String, VecDeque<u64>>>,
    errors: RwLock<HashMap<String, u64>>,
    successes: RwLock<HashMap<String, u64>>,
}

impl Metrics {
    /// Create a new metrics instance
    pub fn new() -> Self {
        Self {
            total_queries: AtomicU64::new(0),
            calls: RwLock::new(HashMap::new()),
            response_times: RwLock::new(HashMap::new()),
            errors: RwLock::new(HashMap::new()),
            successes: RwLock::new(HashMap::new()),
        }
    }

    /// Record the start of an operation
    pub fn record_call(&self, operation: &str) {
        self.total_queries.fetch_add(1, Ordering::Relaxed);
        let mut calls = self.calls.write().unwrap_or_else(PoisonError::into_inner);
        *calls.entry(operation.to_string()).or_insert(0) += 1;
    }

    /// Record operation response time
    pub fn record_response_time(&self, operation: &str, time_ms: u64) {
        let mut times = self
            .response_times
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let entry = times.entry(operation.to_string()).or_default();

        if entry.len() >= RESPONSE_TIME_WINDOW {
            entry.pop_front();
        }
        entry.push_back(time_ms);
    }

    /// Record a failed operation
    pub fn record_error(&self, operation: &str) {
        let mut errors = self.errors.write().unwrap_or_else(PoisonError::into_inner);
        *errors.entry(operation.to_string()).or_insert(0) += 1;
    }

    /// Record a successful operation
    pub fn record_success(&self, operation: &str) {
        let mut successes = self.successes.write().unwrap_or_else(PoisonError::into_inner);
        *successes.entry(operation.to_string()).or_insert(0) += 1;
    }

    /// Get total operations started
    pub fn total_queries(&self) -> u64 {
        self.total_queries.load(Ordering::Relaxed)
    }

    /// Average response time for an operation
    pub fn avg_response_time(&self, operation: &str) -> Option<u64> {
        let times = self
            .response_times
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        times.get(operation).and_then(|t| {
            if t.is_empty() {
                None
            } else {
                Some(t.iter().sum::<u64>() / t.len() as u64)
            }
        })
    }

    /// Success percentage for an operation
    pub fn reliability(&self, operation: &str) -> f64 {
        let errors = self.errors.read().unwrap_or_else(PoisonError::into_inner);
        let successes = self.successes.read().unwrap_or_else(PoisonError::into_inner);

        let error_count = *errors.get(operation).unwrap_or(&0);
        let success_count = *successes.get(operation).unwrap_or(&0);

        let total = error_count + success_count;
        if total == 0 {
            100.0
        } else {
            (success_count as f64 / total as f64) * 100.0
        }
    }

    /// Statistics for every operation seen so far, keyed by operation name
    pub fn snapshot(&self) -> MetricsSnapshot {
        // Copy the counts out first so no lock is held while the helpers take theirs
        let calls: Vec<(String, u64)> = self
            .calls
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(name, count)| (name.clone(), *count))
            .collect();

        let operations = calls
            .into_iter()
            .map(|(name, count)| {
                let errors = self
                    .errors
                    .read()
                    .unwrap_or_else(PoisonError::into_inner)
                    .get(&name)
                    .copied()
                    .unwrap_or(0);
                let stats = OperationStats {
                    calls: count,
                    errors,
                    avg_response_time_ms: self.avg_response_time(&name),
                    reliability: self.reliability(&name),
                };
                (name, stats)
            })
            .collect();

        MetricsSnapshot {
            total_queries: self.total_queries(),
            operations,
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Statistics for a single operation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationStats {
    pub calls: u64,
    pub errors: u64,
    pub avg_response_time_ms: Option<u64>,
    pub reliability: f64,
}

/// Point-in-time copy of all metrics
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub total_queries: u64,
    pub operations: BTreeMap<String, OperationStats>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics() {
        let metrics = Metrics::new();

        metrics.record_call("flights_by_carrier");
        metrics.record_response_time("flights_by_carrier", 100);
        metrics.record_success("flights_by_carrier");

        assert_eq!(metrics.total_queries(), 1);
        assert_eq!(metrics.avg_response_time("flights_by_carrier"), Some(100));
        assert_eq!(metrics.reliability("flights_by_carrier"), 100.0);
    }

    #[test]
    fn test_reliability_with_errors() {
        let metrics = Metrics::new();
        for _ in 0..3 {
            metrics.record_call("delayed_flights");
            metrics.record_success("delayed_flights");
        }
        metrics.record_call("delayed_flights");
        metrics.record_error("delayed_flights");

        assert_eq!(metrics.reliability("delayed_flights"), 75.0);

        let snapshot = metrics.snapshot();
        let stats = &snapshot.operations["delayed_flights"];
        assert_eq!(stats.calls, 4);
        assert_eq!(stats.errors, 1);
        assert_eq!(snapshot.total_queries, 4);
    }

    #[test]
    fn test_response_time_window() {
        let metrics = Metrics::new();
        for _ in 0..RESPONSE_TIME_WINDOW {
            metrics.record_response_time("all_flights", 1000);
        }
        for _ in 0..RESPONSE_TIME_WINDOW {
            metrics.record_response_time("all_flights", 10);
        }
        assert_eq!(metrics.avg_response_time("all_flights"), Some(10));
    }
}
