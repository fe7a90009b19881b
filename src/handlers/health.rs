use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::config::Environment;
use crate::loan::LoanService;

pub async fn root() -> &'static str {
    "Loan Tracker API Server"
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub storage: String,
    pub environment: String,
    pub version: String,
}

/// Health check endpoint
pub async fn health_check(
    State(service): State<Arc<LoanService>>,
    State(environment): State<Environment>,
) -> Json<HealthResponse> {
    // Storage failure details go to the log only
    let (status, storage) = match service.health_check().await {
        Ok(()) => ("healthy", "connected"),
        Err(e) => {
            tracing::warn!(error = %e, "Storage health check failed");
            ("unhealthy", "error")
        }
    };

    Json(HealthResponse {
        status: status.to_string(),
        storage: storage.to_string(),
        environment: environment.as_str().to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
