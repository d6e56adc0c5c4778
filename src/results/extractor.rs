//! Decoding of search responses into typed results

use super::types::{AggregationResult, Bucket, Hit, SearchResult};
use super::wire::{MetricAggregation, RawBucket, RawHit, SearchResponse, TermsAggregation};
use crate::fields;
use crate::query::AggregationRequest;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

/// The engine answered, but not with the documented response shape
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl ExtractError {
    fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedResponse(reason.into())
    }
}

/// Decode a response document.
///
/// `requested` is the aggregation set the request was compiled with; it
/// decides how each entry under `aggregations` is read. Hits with a missing
/// or mistyped required field are skipped.
pub fn extract(
    response: Value,
    requested: &BTreeMap<String, AggregationRequest>,
) -> Result<SearchResult, ExtractError> {
    let response: SearchResponse = serde_json::from_value(response)
        .map_err(|e| ExtractError::malformed(format!("unexpected hit container: {}", e)))?;

    let returned = response.hits.hits.len() as u64;
    let total_hits = response
        .hits
        .total
        .as_ref()
        .map(|t| t.value())
        .unwrap_or(returned);

    let mut hits = Vec::with_capacity(response.hits.hits.len());
    for (position, raw) in response.hits.hits.into_iter().enumerate() {
        match convert_hit(raw) {
            Some(hit) => hits.push(hit),
            None => debug!("Skipping irregular hit at position {}", position),
        }
    }

    let aggregations = extract_aggregations(response.aggregations, requested)?;

    Ok(SearchResult {
        total_hits,
        hits,
        aggregations,
    })
}

fn convert_hit(raw: Value) -> Option<Hit> {
    let RawHit { source } = serde_json::from_value(raw).ok()?;
    let mut source = source?;

    let origin_city = string_field(&source, fields::ORIGIN_CITY)?;
    let dest_city = string_field(&source, fields::DEST_CITY)?;
    let carrier = string_field(&source, fields::CARRIER)?;
    let avg_ticket_price = source.get(fields::AVG_TICKET_PRICE)?.as_f64()?;

    for known in [
        fields::ORIGIN_CITY,
        fields::DEST_CITY,
        fields::CARRIER,
        fields::AVG_TICKET_PRICE,
    ] {
        source.remove(known);
    }

    Some(Hit {
        origin_city,
        dest_city,
        carrier,
        avg_ticket_price,
        extra: source,
    })
}

fn string_field(source: &Map<String, Value>, name: &str) -> Option<String> {
    source.get(name)?.as_str().map(str::to_string)
}

fn extract_aggregations(
    returned: Option<Map<String, Value>>,
    requested: &BTreeMap<String, AggregationRequest>,
) -> Result<BTreeMap<String, AggregationResult>, ExtractError> {
    if requested.is_empty() {
        return Ok(BTreeMap::new());
    }

    let mut returned = returned
        .ok_or_else(|| ExtractError::malformed("aggregations were requested but none returned"))?;

    requested
        .iter()
        .map(|(name, request)| {
            let raw = returned.remove(name).ok_or_else(|| {
                ExtractError::malformed(format!("aggregation '{}' missing from response", name))
            })?;
            let result = extract_aggregation(name, raw, request)?;
            Ok((name.clone(), result))
        })
        .collect()
}

fn extract_aggregation(
    name: &str,
    raw: Value,
    request: &AggregationRequest,
) -> Result<AggregationResult, ExtractError> {
    match request {
        AggregationRequest::TermsCount { nested, .. } => {
            let terms: TermsAggregation = serde_json::from_value(raw).map_err(|e| {
                ExtractError::malformed(format!("aggregation '{}' has no bucket list: {}", name, e))
            })?;
            let metric_name = nested.as_ref().map(|n| n.name.as_str());

            let buckets = terms
                .buckets
                .into_iter()
                .map(|raw| convert_bucket(name, raw, metric_name))
                .collect::<Result<Vec<_>, _>>()?;

            Ok(AggregationResult::Buckets {
                metric: metric_name.map(str::to_string),
                buckets,
            })
        }
        AggregationRequest::Avg { .. } => {
            let metric: MetricAggregation = serde_json::from_value(raw).map_err(|e| {
                ExtractError::malformed(format!("aggregation '{}' is not a metric: {}", name, e))
            })?;
            Ok(AggregationResult::Scalar(metric.value))
        }
    }
}

fn convert_bucket(
    aggregation: &str,
    raw: Value,
    metric_name: Option<&str>,
) -> Result<Bucket, ExtractError> {
    let bucket: RawBucket = serde_json::from_value(raw).map_err(|e| {
        ExtractError::malformed(format!("bad bucket in aggregation '{}': {}", aggregation, e))
    })?;

    let key = match bucket.key {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => {
            return Err(ExtractError::malformed(format!(
                "bucket key in aggregation '{}' is not a scalar: {}",
                aggregation, other
            )))
        }
    };

    let raw_metric = metric_name
        .and_then(|name| bucket.sub_aggregations.get(name).map(|raw| (name, raw)));

    // Absent metric is the null marker; a present one must have the metric shape
    let metric = match raw_metric {
        Some((name, raw)) => {
            let metric: MetricAggregation = serde_json::from_value(raw.clone()).map_err(|e| {
                ExtractError::malformed(format!(
                    "metric '{}' in bucket '{}' of aggregation '{}' is malformed: {}",
                    name, key, aggregation, e
                ))
            })?;
            metric.value
        }
        None => None,
    };

    Ok(Bucket {
        key,
        doc_count: bucket.doc_count.unwrap_or(0),
        metric,
    })
}
