//! Route definitions for the loan tracker API

mod loan;

pub use loan::loan_routes;

use axum::{middleware, routing::get, Router};

use crate::app_state::AppState;
use crate::handlers::{health_check, root};
use crate::middleware::request_tracing;

/// Full API router with shared state and request logging applied
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .merge(loan_routes())
        .with_state(state)
        .layer(middleware::from_fn(request_tracing))
}
