//! Persistence boundary for loans

use async_trait::async_trait;
use thiserror::Error;

use crate::loan::model::{Loan, LoanId, NewLoan, Page};

/// Repository errors
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The row changed since it was read; the caller should re-read it
    #[error("Loan {id} was modified concurrently (expected version {expected_version})")]
    StaleVersion { id: LoanId, expected_version: i32 },

    #[error("Loan {0} not found")]
    NotFound(LoanId),
}

/// Storage contract consumed by [`LoanService`](crate::loan::LoanService)
#[async_trait]
pub trait LoanRepository: Send + Sync {
    /// Fetch a loan, `None` when the id is unknown
    async fn get_by_id(&self, id: LoanId) -> Result<Option<Loan>, RepositoryError>;

    /// Persist a new loan and return it with its assigned id
    async fn add(&self, loan: NewLoan) -> Result<Loan, RepositoryError>;

    /// Write back balance and status.
    ///
    /// Succeeds only if the stored version still equals `loan.version`; on
    /// success `loan.version` and `loan.updated_at` are refreshed in place.
    async fn update(&self, loan: &mut Loan) -> Result<(), RepositoryError>;

    /// One page of loans ordered by id, plus the total number of loans.
    /// `page_number` starts at 1.
    async fn list_paged(&self, page_number: u32, page_size: u32)
        -> Result<Page<Loan>, RepositoryError>;

    /// Connectivity check for health endpoints
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// Rows to skip for a 1-based page
pub(crate) fn page_offset(page_number: u32, page_size: u32) -> i64 {
    i64::from(page_number.saturating_sub(1)) * i64::from(page_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_offset() {
        assert_eq!(page_offset(1, 10), 0);
        assert_eq!(page_offset(3, 10), 20);
        assert_eq!(page_offset(u32::MAX, 100), i64::from(u32::MAX - 1) * 100);
    }
}
