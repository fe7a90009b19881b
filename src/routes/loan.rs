//! Loan route definitions

use axum::{
    routing::{get, post},
    Router,
};

use crate::app_state::AppState;
use crate::handlers::{create_loan, get_loan, list_loans, make_payment};

pub fn loan_routes() -> Router<AppState> {
    Router::new()
        .route("/loan", get(list_loans).post(create_loan))
        .route("/loan/:id", get(get_loan))
        .route("/loan/:id/payment", post(make_payment))
}
