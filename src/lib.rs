//! flightsearch: typed flight searches over an Elasticsearch flight index
//!
//! Searches are described as typed requests, compiled to the engine's query
//! DSL, sent through a [`network::SearchGateway`], and decoded into
//! [`results::SearchResult`] values. A small HTTP surface exposes the
//! delayed-flights search.

pub mod config;
pub mod demo;
pub mod fields;
pub mod metrics;
pub mod network;
pub mod query;
pub mod report;
pub mod results;
pub mod search;
pub mod web;

pub use config::Settings;
pub use results::SearchResult;
pub use search::{QueryError, QueryService};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
