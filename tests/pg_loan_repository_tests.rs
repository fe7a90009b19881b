//! PostgreSQL repository tests

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rust_decimal_macros::dec;
    use sqlx::PgPool;

    use loan_tracker::db;
    use loan_tracker::loan::{
        LoanError, LoanRepository, LoanService, LoanStatus, NewLoan, PgLoanRepository,
        RepositoryError,
    };

    /// Helper to create a migrated test database pool
    async fn setup_test_db() -> PgPool {
        let database_url = std::env::var("TEST_DATABASE_URL")
            .unwrap_or_else(|_| "postgresql://localhost/loan_tracker_test".to_string());

        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(2)
            .connect(&database_url)
            .await
            .expect("Failed to connect to test database");

        db::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        pool
    }

    #[tokio::test]
    #[ignore] // Requires database setup
    async fn test_seed_loans_are_present() {
        let repo = PgLoanRepository::new(setup_test_db().await);

        let paid = repo.get_by_id(3).await.unwrap().expect("seed loan 3");
        assert_eq!(paid.applicant_name, "Michael Scott");
        assert_eq!(paid.status, LoanStatus::Paid);
        assert!(paid.current_balance.is_zero());

        let page = repo.list_paged(1, 2).await.unwrap();
        assert_eq!(page.items.len(), 2);
        assert!(page.total_count >= 3);
    }

    #[tokio::test]
    #[ignore] // Requires database setup
    async fn test_add_and_update_round_trip() {
        let repo = PgLoanRepository::new(setup_test_db().await);

        let mut loan = repo.add(NewLoan::new(dec!(1234.56), "Round Trip")).await.unwrap();
        assert!(loan.id > 3);
        assert_eq!(loan.version, 0);

        loan.current_balance = dec!(234.56);
        repo.update(&mut loan).await.unwrap();
        assert_eq!(loan.version, 1);

        let stored = repo.get_by_id(loan.id).await.unwrap().unwrap();
        assert_eq!(stored.current_balance, dec!(234.56));
        assert_eq!(stored.version, 1);
    }

    #[tokio::test]
    #[ignore] // Requires database setup
    async fn test_stale_update_is_detected() {
        let repo = PgLoanRepository::new(setup_test_db().await);

        let mut first = repo.add(NewLoan::new(dec!(100), "Race")).await.unwrap();
        let mut second = first.clone();

        first.current_balance = dec!(50);
        repo.update(&mut first).await.unwrap();

        second.current_balance = dec!(10);
        let err = repo.update(&mut second).await.unwrap_err();
        assert!(matches!(err, RepositoryError::StaleVersion { .. }));

        second.id = i64::MAX;
        let err = repo.update(&mut second).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound(_)));
    }

    #[tokio::test]
    #[ignore] // Requires database setup
    async fn test_payment_lifecycle_against_postgres() {
        let service = LoanService::new(Arc::new(PgLoanRepository::new(setup_test_db().await)));

        let loan = service.create_loan(dec!(5000), "Jane Doe").await.unwrap();
        let paid = service.make_payment(loan.id, dec!(5000)).await.unwrap().unwrap();
        assert_eq!(paid.status, LoanStatus::Paid);

        let err = service.make_payment(loan.id, dec!(100)).await.unwrap_err();
        assert!(matches!(err, LoanError::Conflict(_)));
    }

    #[tokio::test]
    #[ignore] // Requires database setup
    async fn test_concurrent_payments_against_postgres() {
        let service = LoanService::new(Arc::new(PgLoanRepository::new(setup_test_db().await)));
        let id = service.create_loan(dec!(100), "Contended").await.unwrap().id;

        let mut handles = Vec::new();
        for _ in 0..6 {
            let service = service.clone();
            handles.push(tokio::spawn(async move { service.make_payment(id, dec!(40)).await }));
        }
        for handle in handles {
            let _ = handle.await.unwrap();
        }

        let stored = service.get_loan(id).await.unwrap().unwrap();
        assert!(stored.current_balance >= dec!(0));
        assert!([dec!(100), dec!(60), dec!(20)].contains(&stored.current_balance));
    }

    #[tokio::test]
    #[ignore] // Requires database setup
    async fn test_page_count_agrees_with_rows_under_concurrent_inserts() {
        let repo = PgLoanRepository::new(setup_test_db().await);

        let writer = {
            let repo = repo.clone();
            tokio::spawn(async move {
                for i in 0..20 {
                    let name = format!("Concurrent {}", i);
                    repo.add(NewLoan::new(dec!(10), name)).await.unwrap();
                }
            })
        };

        for _ in 0..20 {
            let page = repo.list_paged(1, 100).await.unwrap();
            let total = usize::try_from(page.total_count).unwrap();
            assert_eq!(page.items.len(), total.min(100));
        }

        writer.await.unwrap();
    }
}
