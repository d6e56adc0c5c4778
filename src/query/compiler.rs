//! Compilation of search requests into the Elasticsearch query DSL

use super::aggregation::AggregationRequest;
use super::descriptor::{Bound, QueryDescriptor, RangeQuery, RangeValue, DATE_FORMAT};
use super::request::SearchRequest;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

/// Compile a request into the JSON body sent to `/<index>/_search`.
///
/// Pure: the same request always yields the same document.
pub fn compile(request: &SearchRequest) -> Value {
    let mut body = Map::new();

    body.insert("query".to_string(), compile_filter(&request.filter));

    if let Some(size) = request.size {
        body.insert("size".to_string(), json!(size));
    }

    if request.track_total_hits {
        body.insert("track_total_hits".to_string(), Value::Bool(true));
    }

    if request.has_aggregations() {
        body.insert(
            "aggs".to_string(),
            compile_aggregations(&request.aggregations),
        );
    }

    Value::Object(body)
}

/// Compile a filter descriptor into a query clause
pub fn compile_filter(filter: &QueryDescriptor) -> Value {
    match filter {
        QueryDescriptor::MatchAll => json!({ "match_all": {} }),
        QueryDescriptor::Term { field, value } => single("term", field, json!(value)),
        QueryDescriptor::Match { field, text } => single("match", field, json!(text)),
        QueryDescriptor::Range(range) => compile_range(range),
        QueryDescriptor::BoolAnd(conj) => {
            let must: Vec<Value> = conj.clauses().iter().map(compile_filter).collect();
            json!({ "bool": { "must": must } })
        }
    }
}

fn compile_range(range: &RangeQuery) -> Value {
    let mut bounds = Map::new();

    if let Some(lower) = range.lower() {
        let op = if lower.inclusive { "gte" } else { "gt" };
        bounds.insert(op.to_string(), bound_value(lower));
    }
    if let Some(upper) = range.upper() {
        let op = if upper.inclusive { "lte" } else { "lt" };
        bounds.insert(op.to_string(), bound_value(upper));
    }

    single("range", range.field(), Value::Object(bounds))
}

fn bound_value(bound: &Bound) -> Value {
    match bound.value {
        RangeValue::Integer(v) => json!(v),
        RangeValue::Float(v) => json!(v),
        RangeValue::Date(d) => Value::String(d.format(DATE_FORMAT).to_string()),
    }
}

fn compile_aggregations(aggs: &BTreeMap<String, AggregationRequest>) -> Value {
    let compiled: Map<String, Value> = aggs
        .iter()
        .map(|(name, agg)| (name.clone(), compile_aggregation(agg)))
        .collect();
    Value::Object(compiled)
}

fn compile_aggregation(agg: &AggregationRequest) -> Value {
    match agg {
        AggregationRequest::TermsCount { field, nested } => {
            let mut body = Map::new();
            body.insert("terms".to_string(), json!({ "field": field }));
            if let Some(nested) = nested {
                let mut sub = Map::new();
                sub.insert(
                    nested.name.clone(),
                    json!({ "avg": { "field": nested.field } }),
                );
                body.insert("aggs".to_string(), Value::Object(sub));
            }
            Value::Object(body)
        }
        AggregationRequest::Avg { field } => json!({ "avg": { "field": field } }),
    }
}

/// `{ kind: { field: value } }`
fn single(kind: &str, field: &str, value: Value) -> Value {
    let mut inner = Map::new();
    inner.insert(field.to_string(), value);
    let mut outer = Map::new();
    outer.insert(kind.to_string(), Value::Object(inner));
    Value::Object(outer)
}
