//! Search request model

use super::aggregation::AggregationRequest;
use super::descriptor::QueryDescriptor;
use std::collections::BTreeMap;

/// A complete search against one index.
///
/// Aggregations are kept in a sorted map so the compiled document is stable
/// across calls.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    /// Target index
    pub index: String,
    /// Document filter
    pub filter: QueryDescriptor,
    /// Named aggregations
    pub aggregations: BTreeMap<String, AggregationRequest>,
    /// Number of hits to return; `Some(0)` suppresses hits entirely
    pub size: Option<u32>,
    /// Ask the engine for an exact total hit count
    pub track_total_hits: bool,
}

impl SearchRequest {
    /// Create a hits-only request with the engine's default page size
    pub fn new(index: impl Into<String>, filter: QueryDescriptor) -> Self {
        Self {
            index: index.into(),
            filter,
            aggregations: BTreeMap::new(),
            size: None,
            track_total_hits: true,
        }
    }

    /// Attach an aggregation. Hits are suppressed (`size = 0`) unless a size
    /// is set afterwards with [`SearchRequest::with_size`].
    pub fn aggregate(mut self, name: impl Into<String>, aggregation: AggregationRequest) -> Self {
        self.aggregations.insert(name.into(), aggregation);
        self.size = Some(0);
        self
    }

    /// Set the number of hits to return
    pub fn with_size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    /// Toggle exact total hit counting
    pub fn with_track_total_hits(mut self, track: bool) -> Self {
        self.track_total_hits = track;
        self
    }

    /// Whether any aggregation was requested
    pub fn has_aggregations(&self) -> bool {
        !self.aggregations.is_empty()
    }
}
