//! Application state shared across handlers

use crate::metrics::Metrics;
use crate::search::QueryService;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Query service shared by all requests
    pub service: Arc<QueryService>,
    /// Operation metrics recorded by the service
    pub metrics: Arc<Metrics>,
}

impl AppState {
    /// Create new application state
    pub fn new(service: QueryService, metrics: Arc<Metrics>) -> Self {
        Self {
            service: Arc::new(service),
            metrics,
        }
    }

    /// Index the service searches
    pub fn index(&self) -> &str {
        self.service.index()
    }
}
