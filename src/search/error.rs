//! Errors raised by query operations

use super::models::Operation;
use crate::network::GatewayError;
use crate::results::ExtractError;
use thiserror::Error;

/// Rejected input parameters
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("invalid {field} range: {min} is greater than {max}")]
    InvertedRange {
        field: &'static str,
        min: String,
        max: String,
    },

    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },

    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: String },

    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("missing query parameter '{0}'")]
    MissingParameter(&'static str),

    #[error("invalid '{field}' query parameter: {reason}")]
    InvalidParameter { field: &'static str, reason: String },
}

/// Why an operation failed
#[derive(Debug, Error)]
pub enum QueryErrorKind {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Extract(#[from] ExtractError),
}

/// A failed operation, tagged with the operation's name
#[derive(Debug, Error)]
#[error("{operation} failed: {kind}")]
pub struct QueryError {
    pub operation: Operation,
    #[source]
    pub kind: QueryErrorKind,
}

impl QueryError {
    pub fn new(operation: Operation, kind: impl Into<QueryErrorKind>) -> Self {
        Self {
            operation,
            kind: kind.into(),
        }
    }

    /// Caller-side problem rather than a downstream failure
    pub fn is_validation(&self) -> bool {
        matches!(self.kind, QueryErrorKind::Validation(_))
    }
}
