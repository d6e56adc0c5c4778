//! Query construction module
//!
//! Typed search requests and their compilation into the engine's query DSL:
//! - Filters: match-all, term, match, range, and conjunctions
//! - Aggregations: terms counts (optionally with a nested average) and averages
//! - Compilation into the JSON document sent to the search endpoint

mod aggregation;
mod compiler;
mod descriptor;
mod request;

pub use aggregation::{AggregationRequest, NestedAvg};
pub use compiler::{compile, compile_filter};
pub use descriptor::{Bound, Conjunction, QueryDescriptor, RangeQuery, RangeValue, DATE_FORMAT};
pub use request::SearchRequest;
