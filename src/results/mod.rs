//! Search results module
//!
//! Typed hits and aggregations, and the extractor that decodes them from
//! the engine's response document.

mod extractor;
mod types;
mod wire;

pub use extractor::{extract, ExtractError};
pub use types::{AggregationResult, Bucket, Hit, SearchResult};
