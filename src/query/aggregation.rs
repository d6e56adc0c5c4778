//! Aggregation requests attached to a search

/// A named aggregation to compute alongside (or instead of) hits
#[derive(Debug, Clone, PartialEq)]
pub enum AggregationRequest {
    /// Bucketed document count per exact field value, optionally with a
    /// per-bucket average of a numeric field.
    ///
    /// No bucket size is sent, so the engine default (10) applies; callers
    /// must not assume more buckets than that.
    TermsCount {
        field: String,
        nested: Option<NestedAvg>,
    },
    /// Mean of a numeric field over all matching documents
    Avg { field: String },
}

impl AggregationRequest {
    pub fn terms(field: impl Into<String>) -> Self {
        Self::TermsCount {
            field: field.into(),
            nested: None,
        }
    }

    /// Terms buckets with an average of `avg_field` attached to each bucket
    /// under `metric_name`.
    pub fn terms_with_avg(
        field: impl Into<String>,
        metric_name: impl Into<String>,
        avg_field: impl Into<String>,
    ) -> Self {
        Self::TermsCount {
            field: field.into(),
            nested: Some(NestedAvg {
                name: metric_name.into(),
                field: avg_field.into(),
            }),
        }
    }

    pub fn avg(field: impl Into<String>) -> Self {
        Self::Avg {
            field: field.into(),
        }
    }
}

/// Average metric nested inside each terms bucket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NestedAvg {
    /// Key the metric appears under inside each bucket
    pub name: String,
    pub field: String,
}
