//! Typed view of the Elasticsearch search response body.
//!
//! Only the parts the extractor reads are modelled. Individual hits and
//! buckets stay as raw JSON here so one irregular entry cannot fail the
//! whole response.

use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    pub hits: HitsContainer,
    #[serde(default)]
    pub aggregations: Option<Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct HitsContainer {
    #[serde(default)]
    pub total: Option<TotalHits>,
    pub hits: Vec<Value>,
}

/// `hits.total` is an object since ES 7, or a bare integer when
/// `rest_total_hits_as_int` is set.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum TotalHits {
    Tracked { value: u64 },
    Count(u64),
}

impl TotalHits {
    pub fn value(&self) -> u64 {
        match self {
            Self::Tracked { value } | Self::Count(value) => *value,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawHit {
    #[serde(rename = "_source")]
    pub source: Option<Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TermsAggregation {
    pub buckets: Vec<Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawBucket {
    pub key: Value,
    #[serde(default)]
    pub doc_count: Option<u64>,
    #[serde(flatten)]
    pub sub_aggregations: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MetricAggregation {
    #[serde(default)]
    pub value: Option<f64>,
}
