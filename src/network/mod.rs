//! Search engine networking module
//!
//! Provides the gateway abstraction over the search engine and its HTTP
//! implementation.

mod client;
mod gateway;

pub use client::EsClient;
pub use gateway::{GatewayError, SearchGateway};
