use axum::response::Json;
use serde::Serialize;
use std::sync::Arc;

use crate::config::{AppConfig, PaginationConfig};
use crate::service::InstrumentService;
use crate::store::traits::InstrumentStore;

/// Per-process state shared by every handler.
pub struct AppState<S: InstrumentStore> {
    pub service: InstrumentService<S>,
    pub store: Arc<S>,
    pub application_name: String,
    pub pagination: PaginationConfig,
}

impl<S: InstrumentStore> AppState<S> {
    pub fn new(store: Arc<S>, config: &AppConfig) -> Self {
        Self {
            service: InstrumentService::new(Arc::clone(&store)),
            store,
            application_name: config.application.name.clone(),
            pagination: config.pagination.clone(),
        }
    }
}

pub type SharedState<S> = Arc<AppState<S>>;

/// Simple health check endpoint
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
