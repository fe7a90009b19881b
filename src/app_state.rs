//! Application state shared across handlers

use std::sync::Arc;

use axum::extract::FromRef;

use crate::config::Environment;
use crate::loan::LoanService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub loan_service: Arc<LoanService>,
    pub environment: Environment,
}

impl AppState {
    pub fn new(loan_service: Arc<LoanService>, environment: Environment) -> Self {
        Self {
            loan_service,
            environment,
        }
    }
}

impl FromRef<AppState> for Arc<LoanService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.loan_service.clone()
    }
}

impl FromRef<AppState> for Environment {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.environment
    }
}
