//! JSON body returned for a search, shaped like the engine's own response

use crate::results::{AggregationResult, SearchResult};
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

#[derive(Debug, Serialize)]
pub struct SearchResponseBody {
    pub hits: HitsBody,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub aggregations: BTreeMap<String, Value>,
}

#[derive(Debug, Serialize)]
pub struct HitsBody {
    pub total: TotalBody,
    pub hits: Vec<HitBody>,
}

#[derive(Debug, Serialize)]
pub struct TotalBody {
    pub value: u64,
    pub relation: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HitBody {
    #[serde(rename = "_source")]
    pub source: Map<String, Value>,
}

fn aggregation_body(result: &AggregationResult) -> Value {
    match result {
        AggregationResult::Scalar(value) => json!({ "value": value }),
        AggregationResult::Buckets { metric, buckets } => {
            let buckets: Vec<Value> = buckets
                .iter()
                .map(|bucket| {
                    let mut body = Map::new();
                    body.insert("key".to_string(), Value::from(bucket.key.as_str()));
                    body.insert("doc_count".to_string(), Value::from(bucket.doc_count));
                    if let Some(name) = metric {
                        body.insert(name.clone(), json!({ "value": bucket.metric }));
                    }
                    Value::Object(body)
                })
                .collect();
            json!({ "buckets": buckets })
        }
    }
}

impl From<&SearchResult> for SearchResponseBody {
    fn from(result: &SearchResult) -> Self {
        Self {
            hits: HitsBody {
                total: TotalBody {
                    value: result.total_hits,
                    relation: "eq",
                },
                hits: result
                    .hits
                    .iter()
                    .map(|hit| HitBody {
                        source: hit.to_source(),
                    })
                    .collect(),
            },
            aggregations: result
                .aggregations
                .iter()
                .map(|(name, agg)| (name.clone(), aggregation_body(agg)))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::{Bucket, Hit};

    #[test]
    fn test_scalar_body() {
        let mut result = SearchResult {
            total_hits: 2800,
            ..SearchResult::default()
        };
        result
            .aggregations
            .insert("avg_delay_time".to_string(), AggregationResult::Scalar(Some(47.5)));

        let body = serde_json::to_value(SearchResponseBody::from(&result)).unwrap();
        assert_eq!(body["hits"]["total"]["value"], 2800);
        assert_eq!(body["hits"]["hits"], json!([]));
        assert_eq!(body["aggregations"]["avg_delay_time"], json!({ "value": 47.5 }));
    }

    #[test]
    fn test_null_scalar_stays_null() {
        let mut result = SearchResult::empty();
        result
            .aggregations
            .insert("avg_delay_time".to_string(), AggregationResult::Scalar(None));

        let body = serde_json::to_value(SearchResponseBody::from(&result)).unwrap();
        assert_eq!(body["aggregations"]["avg_delay_time"]["value"], Value::Null);
    }

    #[test]
    fn test_buckets_and_hits_body() {
        let mut result = SearchResult {
            total_hits: 1,
            hits: vec![Hit::new("Adelaide", "Tokoname", "ES-Air", 320.5)],
            ..SearchResult::default()
        };
        result.aggregations.insert(
            "avg_price_per_carrier".to_string(),
            AggregationResult::Buckets {
                metric: Some("average_price".to_string()),
                buckets: vec![Bucket {
                    key: "ES-Air".to_string(),
                    doc_count: 3,
                    metric: Some(320.5),
                }],
            },
        );

        let body = serde_json::to_value(SearchResponseBody::from(&result)).unwrap();
        assert_eq!(body["hits"]["hits"][0]["_source"]["Carrier"], "ES-Air");
        assert_eq!(
            body["aggregations"]["avg_price_per_carrier"]["buckets"][0],
            json!({ "key": "ES-Air", "doc_count": 3, "average_price": { "value": 320.5 } })
        );
    }

    #[test]
    fn test_aggregations_omitted_when_none() {
        let body = serde_json::to_value(SearchResponseBody::from(&SearchResult::empty())).unwrap();
        assert!(body.get("aggregations").is_none());
    }
}
