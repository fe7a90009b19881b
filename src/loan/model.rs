//! Loan models and the payment state transition

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};

use crate::loan::LoanError;

/// Repository-assigned loan identifier
pub type LoanId = i64;

/// Largest value a `NUMERIC(18, 2)` column can hold
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(2_808_348_671, 232_830_643, 0, false, 2);

/// Decimal places kept by the store
pub const AMOUNT_SCALE: u32 = 2;

/// Maximum length of an applicant name, in characters
pub const MAX_APPLICANT_NAME_LEN: usize = 100;

/// Loan status enum
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "loan_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    Active,
    Paid,
}

impl LoanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::Active => "active",
            LoanStatus::Paid => "paid",
        }
    }
}

/// Loan model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Loan {
    pub id: LoanId,
    pub amount: Decimal,
    pub current_balance: Decimal,
    pub applicant_name: String,
    pub status: LoanStatus,
    /// Row version for optimistic concurrency, bumped by every update
    #[serde(skip, default)]
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Loan {
    pub fn is_paid(&self) -> bool {
        self.status == LoanStatus::Paid
    }

    /// Apply a payment to the outstanding balance.
    ///
    /// Rejects payments on a paid loan (`Conflict`) and payments larger than
    /// the remaining balance (`Validation`). The loan is left untouched when
    /// an error is returned. `payment` must already be known to be positive.
    pub fn apply_payment(&mut self, payment: Decimal) -> Result<(), LoanError> {
        if self.is_paid() {
            return Err(LoanError::Conflict("Loan already paid.".to_string()));
        }

        if payment > self.current_balance {
            return Err(LoanError::Validation(
                "Payment exceeds remaining balance.".to_string(),
            ));
        }

        self.current_balance -= payment;
        if self.current_balance.is_zero() {
            self.status = LoanStatus::Paid;
        }

        Ok(())
    }
}

/// A validated loan that has not been persisted yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewLoan {
    pub amount: Decimal,
    pub current_balance: Decimal,
    pub applicant_name: String,
    pub status: LoanStatus,
}

impl NewLoan {
    /// Fresh loan: full balance outstanding, active
    pub fn new(amount: Decimal, applicant_name: impl Into<String>) -> Self {
        Self {
            amount,
            current_balance: amount,
            applicant_name: applicant_name.into(),
            status: LoanStatus::Active,
        }
    }
}

// Money fields read JSON numbers from their literal text, never through f64.

/// Request to create a new loan
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLoanRequest {
    #[serde(deserialize_with = "rust_decimal::serde::arbitrary_precision::deserialize")]
    pub amount: Decimal,
    #[serde(default)]
    pub applicant_name: String,
}

/// Request to record a payment against a loan
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    #[serde(deserialize_with = "rust_decimal::serde::arbitrary_precision::deserialize")]
    pub payment_amount: Decimal,
}

/// Query for listing loans
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListLoansQuery {
    pub page_number: Option<u32>,
    pub page_size: Option<u32>,
}

/// One slice of loans as returned by a repository
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: i64,
}

/// Paginated response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub total_count: i64,
    pub page_number: u32,
    pub page_size: u32,
}
