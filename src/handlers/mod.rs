//! API handlers

pub mod health;
pub mod loan;

pub use health::{health_check, root};
pub use loan::{create_loan, get_loan, list_loans, make_payment};
