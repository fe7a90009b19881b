//! PostgreSQL loan storage

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;

use crate::loan::model::{Loan, LoanId, NewLoan, Page};
use crate::loan::repository::{page_offset, LoanRepository, RepositoryError};

/// Loan repository backed by the `loans` table
#[derive(Clone)]
pub struct PgLoanRepository {
    db_pool: PgPool,
}

impl PgLoanRepository {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl LoanRepository for PgLoanRepository {
    async fn get_by_id(&self, id: LoanId) -> Result<Option<Loan>, RepositoryError> {
        let loan = sqlx::query_as::<_, Loan>("SELECT * FROM loans WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db_pool)
            .await?;

        Ok(loan)
    }

    async fn add(&self, loan: NewLoan) -> Result<Loan, RepositoryError> {
        let now = Utc::now();

        let loan = sqlx::query_as::<_, Loan>(
            r#"
            INSERT INTO loans (
                amount, current_balance, applicant_name, status,
                version, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, 0, $5, $5)
            RETURNING *
            "#,
        )
        .bind(loan.amount)
        .bind(loan.current_balance)
        .bind(loan.applicant_name)
        .bind(loan.status)
        .bind(now)
        .fetch_one(&self.db_pool)
        .await?;

        Ok(loan)
    }

    async fn update(&self, loan: &mut Loan) -> Result<(), RepositoryError> {
        let now = Utc::now();

        let new_version = sqlx::query_scalar::<_, i32>(
            r#"
            UPDATE loans
            SET current_balance = $1, status = $2, version = version + 1, updated_at = $3
            WHERE id = $4 AND version = $5
            RETURNING version
            "#,
        )
        .bind(loan.current_balance)
        .bind(loan.status)
        .bind(now)
        .bind(loan.id)
        .bind(loan.version)
        .fetch_optional(&self.db_pool)
        .await?;

        match new_version {
            Some(version) => {
                loan.version = version;
                loan.updated_at = now;
                Ok(())
            }
            None => {
                let exists: bool =
                    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM loans WHERE id = $1)")
                        .bind(loan.id)
                        .fetch_one(&self.db_pool)
                        .await?;

                if exists {
                    Err(RepositoryError::StaleVersion {
                        id: loan.id,
                        expected_version: loan.version,
                    })
                } else {
                    Err(RepositoryError::NotFound(loan.id))
                }
            }
        }
    }

    async fn list_paged(
        &self,
        page_number: u32,
        page_size: u32,
    ) -> Result<Page<Loan>, RepositoryError> {
        // Count and slice must come from one snapshot
        let mut tx = self.db_pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
            .execute(&mut *tx)
            .await?;

        let total_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM loans")
            .fetch_one(&mut *tx)
            .await?;

        let items = sqlx::query_as::<_, Loan>("SELECT * FROM loans ORDER BY id LIMIT $1 OFFSET $2")
            .bind(i64::from(page_size))
            .bind(page_offset(page_number, page_size))
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(Page { items, total_count })
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.db_pool).await?;
        Ok(())
    }
}
