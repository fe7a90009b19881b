//! Loan service layer - Business logic for loan management

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::loan::model::{
    Loan, LoanId, NewLoan, PaginatedResponse, AMOUNT_SCALE, MAX_AMOUNT, MAX_APPLICANT_NAME_LEN,
};
use crate::loan::repository::{LoanRepository, RepositoryError};
use crate::loan::LoanError;

/// Largest page a caller may request
pub const MAX_PAGE_SIZE: u32 = 100;

/// Read-validate-write rounds attempted before giving up on a contended loan
const MAX_PAYMENT_ATTEMPTS: usize = 3;

/// Loan service for managing loan lifecycle
#[derive(Clone)]
pub struct LoanService {
    repository: Arc<dyn LoanRepository>,
}

impl LoanService {
    /// Create a new loan service instance
    pub fn new(repository: Arc<dyn LoanRepository>) -> Self {
        Self { repository }
    }

    /// Issue a new loan with its full amount outstanding
    pub async fn create_loan(
        &self,
        amount: Decimal,
        applicant_name: &str,
    ) -> Result<Loan, LoanError> {
        if amount <= Decimal::ZERO {
            return Err(LoanError::validation("Amount must be greater than zero."));
        }
        check_money_bounds(amount, "Amount")?;

        let applicant_name = applicant_name.trim();
        if applicant_name.is_empty() {
            return Err(LoanError::validation("Applicant name is required."));
        }
        if applicant_name.chars().count() > MAX_APPLICANT_NAME_LEN {
            return Err(LoanError::validation(format!(
                "Applicant name must be at most {} characters.",
                MAX_APPLICANT_NAME_LEN
            )));
        }

        let loan = self
            .repository
            .add(NewLoan::new(amount, applicant_name))
            .await?;

        tracing::info!(loan_id = loan.id, amount = %loan.amount, "Loan created");

        Ok(loan)
    }

    /// Get loan by ID
    pub async fn get_loan(&self, id: LoanId) -> Result<Option<Loan>, LoanError> {
        Ok(self.repository.get_by_id(id).await?)
    }

    /// List one page of loans
    pub async fn list_loans(
        &self,
        page_number: u32,
        page_size: u32,
    ) -> Result<PaginatedResponse<Loan>, LoanError> {
        if page_number < 1 {
            return Err(LoanError::validation("Page number must be at least 1."));
        }
        if page_size < 1 || page_size > MAX_PAGE_SIZE {
            return Err(LoanError::validation(format!(
                "Page size must be between 1 and {}.",
                MAX_PAGE_SIZE
            )));
        }

        let page = self.repository.list_paged(page_number, page_size).await?;

        Ok(PaginatedResponse {
            data: page.items,
            total_count: page.total_count,
            page_number,
            page_size,
        })
    }

    /// Record a payment against a loan.
    ///
    /// Returns `Ok(None)` when the loan does not exist. Every check runs
    /// before the balance is touched, and each attempt validates against the
    /// balance as currently stored, so concurrent payments can never push the
    /// balance below zero or re-open a paid loan.
    pub async fn make_payment(
        &self,
        id: LoanId,
        payment_amount: Decimal,
    ) -> Result<Option<Loan>, LoanError> {
        if payment_amount <= Decimal::ZERO {
            return Err(LoanError::validation("Payment amount must be greater than zero."));
        }
        check_money_bounds(payment_amount, "Payment amount")?;

        for attempt in 1..=MAX_PAYMENT_ATTEMPTS {
            let Some(mut loan) = self.repository.get_by_id(id).await? else {
                return Ok(None);
            };

            if let Err(e) = loan.apply_payment(payment_amount) {
                tracing::debug!(
                    loan_id = id,
                    payment = %payment_amount,
                    error = %e,
                    "Payment rejected"
                );
                return Err(e);
            }

            match self.repository.update(&mut loan).await {
                Ok(()) => {
                    tracing::info!(
                        loan_id = id,
                        payment = %payment_amount,
                        balance = %loan.current_balance,
                        status = loan.status.as_str(),
                        "Payment recorded"
                    );
                    return Ok(Some(loan));
                }
                Err(RepositoryError::StaleVersion { .. }) => {
                    tracing::warn!(loan_id = id, attempt, "Loan changed during payment, retrying");
                }
                // Vanished between read and write
                Err(RepositoryError::NotFound(_)) => return Ok(None),
                Err(e) => return Err(e.into()),
            }
        }

        Err(LoanError::conflict("Loan was modified concurrently."))
    }

    /// Check the backing store is reachable
    pub async fn health_check(&self) -> Result<(), LoanError> {
        Ok(self.repository.ping().await?)
    }
}

/// Reject values the `NUMERIC(18, 2)` columns cannot hold exactly
fn check_money_bounds(value: Decimal, field: &str) -> Result<(), LoanError> {
    if value.normalize().scale() > AMOUNT_SCALE {
        return Err(LoanError::validation(format!(
            "{} must have at most {} decimal places.",
            field, AMOUNT_SCALE
        )));
    }
    if value > MAX_AMOUNT {
        return Err(LoanError::validation(format!(
            "{} must not exceed {}.",
            field, MAX_AMOUNT
        )));
    }
    Ok(())
}
