//! HTTP request handlers

use super::error::ApiError;
use super::response::SearchResponseBody;
use super::state::AppState;
use crate::metrics::MetricsSnapshot;
use crate::search::ValidationError;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::Method,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Query parameters for the delayed-flights search
#[derive(Debug, Deserialize)]
pub struct DelayParams {
    /// Minimum delay in whole minutes, exclusive
    pub time: Option<String>,
}

impl DelayParams {
    fn minutes(&self) -> Result<i64, ValidationError> {
        let raw = match self.time.as_deref() {
            Some(t) if !t.trim().is_empty() => t,
            _ => return Err(ValidationError::MissingParameter("time")),
        };
        raw.parse().map_err(|_| ValidationError::InvalidParameter {
            field: "time",
            reason: "must be an integer".to_string(),
        })
    }
}

/// Delayed flights handler
pub async fn delayed_flights(
    State(state): State<AppState>,
    params: Result<Query<DelayParams>, QueryRejection>,
) -> Result<Json<SearchResponseBody>, ApiError> {
    let Query(params) = params?;
    let minutes = params.minutes()?;
    debug!("Delayed flights request: time={}", minutes);

    let result = state.service.delayed_flights(minutes).await?;
    Ok(Json(SearchResponseBody::from(&result)))
}

/// Any method other than GET on a search route
pub async fn method_not_allowed(method: Method) -> ApiError {
    ApiError::MethodNotAllowed(method)
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub index: String,
    #[serde(flatten)]
    pub metrics: MetricsSnapshot,
}

/// Operation statistics handler
pub async fn stats(State(state): State<AppState>) -> impl IntoResponse {
    Json(StatsResponse {
        index: state.index().to_string(),
        metrics: state.metrics.snapshot(),
    })
}

/// Health check handler
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION
    }))
}
