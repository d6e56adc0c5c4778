//! HTTP error responses

use crate::network::GatewayError;
use crate::search::{QueryError, QueryErrorKind, ValidationError};
use axum::extract::rejection::QueryRejection;
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::error;

/// Errors surfaced by request handlers
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    BadRequest(#[from] ValidationError),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error("{}", .0.body_text())]
    QueryString(#[from] QueryRejection),

    #[error("method {0} is not allowed, use GET")]
    MethodNotAllowed(Method),
}

/// Engine-style error body
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorDetail,
    status: u16,
}

#[derive(Debug, Serialize)]
struct ErrorDetail {
    #[serde(rename = "type")]
    error_type: &'static str,
    reason: String,
}

impl ApiError {
    fn error_type(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "validation_exception",
            Self::QueryString(_) => "parse_exception",
            Self::MethodNotAllowed(_) => "method_not_allowed_exception",
            Self::Query(e) => match &e.kind {
                QueryErrorKind::Validation(_) => "validation_exception",
                QueryErrorKind::Gateway(GatewayError::Timeout(_)) => "timeout_exception",
                QueryErrorKind::Gateway(GatewayError::Transport(_)) => "transport_exception",
                QueryErrorKind::Gateway(GatewayError::Protocol { .. }) => "search_engine_exception",
                QueryErrorKind::Extract(_) => "malformed_response_exception",
            },
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::QueryString(_) => StatusCode::BAD_REQUEST,
            Self::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            Self::Query(e) if e.is_validation() => StatusCode::BAD_REQUEST,
            Self::Query(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }

        let body = ErrorResponse {
            error: ErrorDetail {
                error_type: self.error_type(),
                reason: self.to_string(),
            },
            status: status.as_u16(),
        };

        let mut response = (status, axum::Json(body)).into_response();
        if let Self::MethodNotAllowed(_) = self {
            response
                .headers_mut()
                .insert(header::ALLOW, HeaderValue::from_static("GET, HEAD"));
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::ExtractError;
    use crate::search::Operation;

    #[test]
    fn test_status_codes() {
        let missing = ApiError::from(ValidationError::MissingParameter("time"));
        assert_eq!(missing.status_code(), StatusCode::BAD_REQUEST);

        let negative = ApiError::from(QueryError::new(
            Operation::LongDistanceFlights,
            ValidationError::Negative {
                field: "distance",
                value: "-1".to_string(),
            },
        ));
        assert_eq!(negative.status_code(), StatusCode::BAD_REQUEST);

        let malformed = ApiError::from(QueryError::new(
            Operation::DelayedFlights,
            ExtractError::MalformedResponse("no hits".to_string()),
        ));
        assert_eq!(malformed.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(malformed.error_type(), "malformed_response_exception");

        let post = ApiError::MethodNotAllowed(Method::POST);
        assert_eq!(post.status_code(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(post.to_string(), "method POST is not allowed, use GET");
    }
}
