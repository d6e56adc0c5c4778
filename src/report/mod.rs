//! Console listing of search results
//!
//! Used by the startup batch. The `format_*` functions build the text so it
//! can be checked without capturing stdout.

use crate::results::{AggregationResult, Bucket, SearchResult};
use crate::search::intents;
use std::fmt::Write;

/// How one named aggregation is labelled in listings
struct Labels<'a> {
    key: &'a str,
    metric: &'a str,
    /// Prefix for metric values
    currency: &'a str,
    /// Suffix for scalar values
    unit: &'a str,
}

fn labels(name: &str) -> Labels<'_> {
    match name {
        intents::AVG_PRICE_PER_CARRIER => Labels {
            key: "Carrier",
            metric: "Average Price",
            currency: "$",
            unit: "",
        },
        intents::FLIGHTS_PER_COUNTRY => Labels {
            key: "Country",
            metric: "",
            currency: "",
            unit: "",
        },
        intents::AVG_DELAY_TIME => Labels {
            key: "Average Delay Time",
            metric: "",
            currency: "",
            unit: " minutes",
        },
        other => Labels {
            key: other,
            metric: "Value",
            currency: "",
            unit: "",
        },
    }
}

fn number(value: Option<f64>, currency: &str) -> String {
    match value {
        Some(v) => format!("{}{:.2}", currency, v),
        None => "n/a".to_string(),
    }
}

/// Hit listing: the total, then at most `preview` flights
pub fn format_hits(result: &SearchResult, preview: usize) -> String {
    let mut out = String::new();

    if result.is_empty() {
        out.push_str("No hits found\n");
        return out;
    }

    let _ = writeln!(out, "Total hits: {}", result.total_hits);

    for hit in result.hits.iter().take(preview) {
        let _ = writeln!(
            out,
            "Flight: {} -> {} (Carrier: {}, Price: ${:.2})",
            hit.origin_city, hit.dest_city, hit.carrier, hit.avg_ticket_price
        );
    }
    if result.hits.len() > preview {
        out.push_str("...\n");
    }

    out
}

/// Aggregation listing, one line per bucket or scalar
pub fn format_aggregations(result: &SearchResult) -> String {
    let mut out = String::new();

    if result.aggregations.is_empty() {
        out.push_str("No aggregations found\n");
        return out;
    }

    for (name, aggregation) in &result.aggregations {
        let labels = labels(name);
        match aggregation {
            AggregationResult::Buckets { metric, buckets } => {
                for Bucket {
                    key,
                    doc_count,
                    metric: value,
                } in buckets
                {
                    if metric.is_some() {
                        let _ = writeln!(
                            out,
                            "{}: {}, {}: {}",
                            labels.key,
                            key,
                            labels.metric,
                            number(*value, labels.currency)
                        );
                    } else {
                        let _ = writeln!(out, "{}: {}, Flights: {}", labels.key, key, doc_count);
                    }
                }
            }
            AggregationResult::Scalar(value) => {
                let _ = match value {
                    Some(v) => writeln!(out, "{}: {:.2}{}", labels.key, v, labels.unit),
                    None => writeln!(out, "{}: n/a", labels.key),
                };
            }
        }
    }

    out
}

pub fn print_hits(result: &SearchResult, preview: usize) {
    print!("{}", format_hits(result, preview));
}

pub fn print_aggregations(result: &SearchResult) {
    print!("{}", format_aggregations(result));
}
