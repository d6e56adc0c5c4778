//! The search engine seen as a single request/response capability

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Failure to obtain a response document from the engine
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The engine could not be reached
    #[error("transport error: {0}")]
    Transport(String),

    /// No response within the deadline
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The engine answered with an error status or a non-JSON body
    #[error("engine rejected the request (HTTP {status}): {reason}")]
    Protocol { status: u16, reason: String },
}

impl GatewayError {
    /// Connectivity failures, as opposed to the engine refusing the query
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Timeout(_))
    }
}

/// Executes compiled query documents against an index.
///
/// Implementations must be safe to share across concurrent requests.
#[async_trait]
pub trait SearchGateway: Send + Sync {
    /// Send `query` to `index` and return the raw response document
    async fn execute(&self, index: &str, query: &Value) -> Result<Value, GatewayError>;
}
