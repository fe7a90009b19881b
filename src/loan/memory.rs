//! In-memory loan storage, for tests and database-less runs

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::loan::model::{Loan, LoanId, NewLoan, Page};
use crate::loan::repository::{page_offset, LoanRepository, RepositoryError};

#[derive(Debug, Default)]
struct Store {
    loans: BTreeMap<LoanId, Loan>,
    last_id: LoanId,
}

/// Loan repository backed by a process-local map.
///
/// Cloning shares the underlying store. Ids are assigned sequentially from 1
/// and never reused.
#[derive(Clone, Default)]
pub struct InMemoryLoanRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryLoanRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored loans
    pub async fn len(&self) -> usize {
        self.store.read().await.loans.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl LoanRepository for InMemoryLoanRepository {
    async fn get_by_id(&self, id: LoanId) -> Result<Option<Loan>, RepositoryError> {
        Ok(self.store.read().await.loans.get(&id).cloned())
    }

    async fn add(&self, loan: NewLoan) -> Result<Loan, RepositoryError> {
        let mut store = self.store.write().await;
        store.last_id += 1;

        let now = Utc::now();
        let loan = Loan {
            id: store.last_id,
            amount: loan.amount,
            current_balance: loan.current_balance,
            applicant_name: loan.applicant_name,
            status: loan.status,
            version: 0,
            created_at: now,
            updated_at: now,
        };
        store.loans.insert(loan.id, loan.clone());

        Ok(loan)
    }

    async fn update(&self, loan: &mut Loan) -> Result<(), RepositoryError> {
        let mut store = self.store.write().await;
        let stored = store
            .loans
            .get_mut(&loan.id)
            .ok_or(RepositoryError::NotFound(loan.id))?;

        if stored.version != loan.version {
            return Err(RepositoryError::StaleVersion {
                id: loan.id,
                expected_version: loan.version,
            });
        }

        loan.version += 1;
        loan.updated_at = Utc::now();
        stored.current_balance = loan.current_balance;
        stored.status = loan.status;
        stored.version = loan.version;
        stored.updated_at = loan.updated_at;

        Ok(())
    }

    async fn list_paged(
        &self,
        page_number: u32,
        page_size: u32,
    ) -> Result<Page<Loan>, RepositoryError> {
        let store = self.store.read().await;
        let offset = usize::try_from(page_offset(page_number, page_size)).unwrap_or(usize::MAX);

        let items = store
            .loans
            .values()
            .skip(offset)
            .take(page_size as usize)
            .cloned()
            .collect();

        Ok(Page {
            items,
            total_count: store.loans.len() as i64,
        })
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}
