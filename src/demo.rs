//! Startup batch exercising every flight search once

use crate::report;
use crate::results::SearchResult;
use crate::search::{FlightCriteria, Operation, QueryError, QueryService, ValidationError};
use chrono::NaiveDate;
use tracing::{info, warn};

/// Outcome counts of one batch run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DemoSummary {
    pub succeeded: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Copy)]
enum Step {
    AllFlights,
    Carrier,
    PriceRange,
    OriginCity,
    LongDistance,
    DateRange,
    AveragePrice,
    PerDestination,
    Delayed,
    MultipleCriteria,
}

const STEPS: [Step; 10] = [
    Step::AllFlights,
    Step::Carrier,
    Step::PriceRange,
    Step::OriginCity,
    Step::LongDistance,
    Step::DateRange,
    Step::AveragePrice,
    Step::PerDestination,
    Step::Delayed,
    Step::MultipleCriteria,
];

impl Step {
    fn title(&self) -> &'static str {
        match self {
            Self::AllFlights => "Getting all flights",
            Self::Carrier => "Getting flights by carrier (ES-Air)",
            Self::PriceRange => "Getting flights in price range ($200-$400)",
            Self::OriginCity => "Getting flights from Adelaide",
            Self::LongDistance => "Getting long distance flights (>5000km)",
            Self::DateRange => "Getting flights within date range",
            Self::AveragePrice => "Getting average price per carrier",
            Self::PerDestination => "Getting flights per destination",
            Self::Delayed => "Getting delayed flights (>60 minutes)",
            Self::MultipleCriteria => "Getting flights with multiple criteria",
        }
    }

    fn lists_aggregations(&self) -> bool {
        matches!(self, Self::AveragePrice | Self::PerDestination | Self::Delayed)
    }

    async fn run(&self, service: &QueryService) -> Result<SearchResult, QueryError> {
        match self {
            Self::AllFlights => service.all_flights().await,
            Self::Carrier => service.flights_by_carrier("ES-Air").await,
            Self::PriceRange => service.flights_by_price_range(200.0, 400.0).await,
            Self::OriginCity => service.flights_by_origin_city("Adelaide").await,
            Self::LongDistance => service.long_distance_flights(5000.0).await,
            Self::DateRange => {
                match NaiveDate::from_ymd_opt(2022, 1, 1).zip(NaiveDate::from_ymd_opt(2022, 1, 31)) {
                    Some((start, end)) => service.flights_by_date_range(start, end).await,
                    None => Err(QueryError::new(
                        Operation::FlightsByDateRange,
                        ValidationError::InvalidParameter {
                            field: "date",
                            reason: "not a calendar date".to_string(),
                        },
                    )),
                }
            }
            Self::AveragePrice => service.average_price_per_carrier().await,
            Self::PerDestination => service.flights_per_destination().await,
            Self::Delayed => service.delayed_flights(60).await,
            Self::MultipleCriteria => {
                let criteria = FlightCriteria::new("ES-Air", "Adelaide", "Tokoname");
                service.flights_by_multiple_criteria(&criteria).await
            }
        }
    }
}

/// Run the batch in order, printing each result.
///
/// A failed step is logged and the batch moves on.
pub async fn run(service: &QueryService, preview_hits: usize) -> DemoSummary {
    let mut summary = DemoSummary::default();

    for (number, step) in STEPS.iter().enumerate() {
        println!("\n{}. {}:", number + 1, step.title());

        match step.run(service).await {
            Ok(result) => {
                summary.succeeded += 1;
                if step.lists_aggregations() {
                    report::print_aggregations(&result);
                } else {
                    report::print_hits(&result, preview_hits);
                }
            }
            Err(e) => {
                summary.failed += 1;
                warn!("{}", e);
            }
        }
    }

    info!(
        "Demo batch finished: {} succeeded, {} failed",
        summary.succeeded, summary.failed
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{GatewayError, SearchGateway};
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Fails every other call and answers the rest with an empty result
    struct Flaky {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl SearchGateway for Flaky {
        async fn execute(&self, _index: &str, query: &Value) -> Result<Value, GatewayError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n % 2 == 1 {
                return Err(GatewayError::Transport("connection reset".to_string()));
            }
            let mut response = json!({
                "hits": { "total": { "value": 0, "relation": "eq" }, "hits": [] }
            });
            if let Some(aggs) = query.get("aggs").and_then(Value::as_object) {
                let returned: serde_json::Map<String, Value> = aggs
                    .iter()
                    .map(|(name, body)| {
                        let value = if body.get("terms").is_some() {
                            json!({ "buckets": [] })
                        } else {
                            json!({ "value": null })
                        };
                        (name.clone(), value)
                    })
                    .collect();
                response["aggregations"] = Value::Object(returned);
            }
            Ok(response)
        }
    }

    #[tokio::test]
    async fn test_batch_continues_after_failures() {
        let gateway = Arc::new(Flaky {
            calls: AtomicUsize::new(0),
        });
        let service = QueryService::new(gateway.clone(), "kibana_sample_data_flights");

        let summary = run(&service, 3).await;

        assert_eq!(gateway.calls.load(Ordering::SeqCst), 10);
        assert_eq!(
            summary,
            DemoSummary {
                succeeded: 5,
                failed: 5
            }
        );
    }
}
