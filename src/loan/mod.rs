//! Loan domain: entity, persistence boundary and business rules

pub mod memory;
pub mod model;
pub mod postgres;
pub mod repository;
pub mod service;

use thiserror::Error;

pub use memory::InMemoryLoanRepository;
pub use model::*;
pub use postgres::PgLoanRepository;
pub use repository::{LoanRepository, RepositoryError};
pub use service::LoanService;

/// Errors raised by loan operations
///
/// Absence of a loan is not an error; lookups return `Option` instead.
#[derive(Error, Debug)]
pub enum LoanError {
    /// The caller supplied an out-of-contract value
    #[error("{0}")]
    Validation(String),

    /// The operation is not allowed in the loan's current state
    #[error("{0}")]
    Conflict(String),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl LoanError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }
}
