//! Result type definitions

use crate::fields;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// A single flight document matched by a search
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hit {
    pub origin_city: String,
    pub dest_city: String,
    pub carrier: String,
    pub avg_ticket_price: f64,
    /// Source fields not modelled above, passed through untouched
    pub extra: Map<String, Value>,
}

impl Hit {
    /// Create a hit with no passthrough fields
    pub fn new(
        origin_city: impl Into<String>,
        dest_city: impl Into<String>,
        carrier: impl Into<String>,
        avg_ticket_price: f64,
    ) -> Self {
        Self {
            origin_city: origin_city.into(),
            dest_city: dest_city.into(),
            carrier: carrier.into(),
            avg_ticket_price,
            extra: Map::new(),
        }
    }

    /// Rebuild the `_source` document using the index's own field names
    pub fn to_source(&self) -> Map<String, Value> {
        let mut source = self.extra.clone();
        source.insert(fields::ORIGIN_CITY.to_string(), Value::from(self.origin_city.as_str()));
        source.insert(fields::DEST_CITY.to_string(), Value::from(self.dest_city.as_str()));
        source.insert(fields::CARRIER.to_string(), Value::from(self.carrier.as_str()));
        source.insert(
            fields::AVG_TICKET_PRICE.to_string(),
            Value::from(self.avg_ticket_price),
        );
        source
    }
}

/// One group of a terms aggregation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bucket {
    /// Field value the bucket groups on
    pub key: String,
    pub doc_count: u64,
    /// Nested average for this bucket; `None` when the engine had no value
    pub metric: Option<f64>,
}

/// Decoded value of one named aggregation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationResult {
    /// Buckets in engine order (usually descending document count)
    Buckets {
        /// Name of the nested metric carried by each bucket, if any
        metric: Option<String>,
        buckets: Vec<Bucket>,
    },
    /// Single metric value; `None` means "no data", which is distinct from zero
    Scalar(Option<f64>),
}

impl AggregationResult {
    pub fn as_scalar(&self) -> Option<Option<f64>> {
        match self {
            Self::Scalar(v) => Some(*v),
            Self::Buckets { .. } => None,
        }
    }

    pub fn as_buckets(&self) -> Option<&[Bucket]> {
        match self {
            Self::Buckets { buckets, .. } => Some(buckets),
            Self::Scalar(_) => None,
        }
    }
}

/// Decoded product of one search response
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchResult {
    /// Total matching documents as reported by the engine
    pub total_hits: u64,
    /// Hits that decoded cleanly, in engine order
    pub hits: Vec<Hit>,
    pub aggregations: BTreeMap<String, AggregationResult>,
}

impl SearchResult {
    /// Result with no hits and no aggregations
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether no documents matched
    pub fn is_empty(&self) -> bool {
        self.total_hits == 0 && self.hits.is_empty()
    }

    /// Look up an aggregation by name
    pub fn aggregation(&self, name: &str) -> Option<&AggregationResult> {
        self.aggregations.get(name)
    }

    /// Scalar aggregation value; outer `None` if the aggregation is missing
    /// or bucketed
    pub fn scalar(&self, name: &str) -> Option<Option<f64>> {
        self.aggregation(name).and_then(AggregationResult::as_scalar)
    }

    /// Buckets of a terms aggregation
    pub fn buckets(&self, name: &str) -> Option<&[Bucket]> {
        self.aggregation(name).and_then(AggregationResult::as_buckets)
    }

    /// Keep only the first `limit` hits. `total_hits` is left unchanged.
    pub fn truncate_hits(&mut self, limit: usize) {
        self.hits.truncate(limit);
    }
}
