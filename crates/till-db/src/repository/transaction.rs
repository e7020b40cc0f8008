//! # Transaction Repository
//!
//! The atomic checkout commit and transaction history.
//!
//! ## Checkout Commit
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  BEGIN IMMEDIATE                       write lock taken up front       │
//! │    │                                                                    │
//! │    ├── SELECT customer                    missing → CustomerNotFound   │
//! │    ├── SELECT products WHERE id IN (…)    one batched read             │
//! │    ├── checkout::prepare_checkout         price, payment, stock plan   │
//! │    │                                                                    │
//! │    ├── for each product (sorted by id):                                │
//! │    │     UPDATE products SET stock = new                               │
//! │    │      WHERE id = ? AND stock = observed   0 rows → WriteConflict   │
//! │    │                                                                    │
//! │    ├── INSERT INTO transactions                                        │
//! │  COMMIT                                                                │
//! │                                                                         │
//! │  Any error before COMMIT drops the transaction, which rolls back.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Taking the write lock at BEGIN makes concurrent commits queue on SQLite's
//! busy timeout. A deferred transaction would instead fail with BUSY when it
//! upgrades from reader to writer after another commit. `WriteConflict` and
//! `Busy` can still surface (busy timeout exceeded), and the caller retries
//! the whole commit with `retry::retry_on_transient`.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::filter::{self, TRANSACTION_COLUMNS};
use till_core::checkout;
use till_core::query::TransactionFilter;
use till_core::{CheckoutOrder, CoreError, OrderLine, Product, Transaction};

/// Row shape of the `transactions` table.
#[derive(Debug, sqlx::FromRow)]
struct TransactionRow {
    id: String,
    customer_id: String,
    product_details: String,
    paid_amount: i64,
    change_amount: i64,
    created_at: DateTime<Utc>,
}

impl TryFrom<TransactionRow> for Transaction {
    type Error = DbError;

    fn try_from(row: TransactionRow) -> Result<Self, Self::Error> {
        let product_details: Vec<OrderLine> = serde_json::from_str(&row.product_details)?;
        Ok(Transaction {
            transaction_id: row.id,
            customer_id: row.customer_id,
            product_details,
            paid: row.paid_amount,
            change: row.change_amount,
            created_at: row.created_at,
        })
    }
}

/// Repository for checkout commits and transaction history.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    pool: SqlitePool,
}

impl TransactionRepository {
    /// Creates a new TransactionRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TransactionRepository { pool }
    }

    /// Validates and commits one checkout in a single SQLite transaction.
    ///
    /// ## Returns
    /// * `Ok(Transaction)` - Stock decremented and transaction recorded
    /// * `Err(DbError::Domain)` - A business rule failed; nothing written
    /// * `Err(DbError::WriteConflict | DbError::Busy)` - Lost a race; retry
    pub async fn commit_checkout(&self, order: &CheckoutOrder) -> DbResult<Transaction> {
        let mut tx = self.pool.begin_with("BEGIN IMMEDIATE").await?;

        let customer: Option<String> =
            sqlx::query_scalar("SELECT id FROM customers WHERE id = ?1")
                .bind(&order.customer_id)
                .fetch_optional(&mut *tx)
                .await?;
        if customer.is_none() {
            return Err(CoreError::CustomerNotFound(order.customer_id.clone()).into());
        }

        let ids = checkout::distinct_product_ids(&order.lines);
        let catalog: HashMap<String, Product> = if ids.is_empty() {
            HashMap::new()
        } else {
            filter::products_by_ids(&ids)
                .build_query_as::<Product>()
                .fetch_all(&mut *tx)
                .await?
                .into_iter()
                .map(|product| (product.id.clone(), product))
                .collect()
        };

        let plan = checkout::prepare_checkout(order, &catalog)?;
        let now = Utc::now();

        for decrement in &plan.decrements {
            let result = sqlx::query(
                "UPDATE products SET stock = ?1, updated_at = ?2 WHERE id = ?3 AND stock = ?4",
            )
            .bind(decrement.new_stock)
            .bind(now)
            .bind(&decrement.product_id)
            .bind(decrement.current_stock)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                debug!(product_id = %decrement.product_id, "Stock changed during checkout");
                return Err(DbError::WriteConflict(format!(
                    "stock of product {} changed",
                    decrement.product_id
                )));
            }
        }

        let transaction = Transaction {
            transaction_id: Uuid::new_v4().to_string(),
            customer_id: order.customer_id.clone(),
            product_details: order.lines.clone(),
            paid: order.paid.minor(),
            change: order.change.minor(),
            created_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO transactions (
                id, customer_id, product_details, paid_amount, change_amount, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&transaction.transaction_id)
        .bind(&transaction.customer_id)
        .bind(serde_json::to_string(&transaction.product_details)?)
        .bind(transaction.paid)
        .bind(transaction.change)
        .bind(transaction.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(
            transaction_id = %transaction.transaction_id,
            customer_id = %transaction.customer_id,
            total = %plan.total,
            "Checkout committed"
        );

        Ok(transaction)
    }

    /// Lists transactions, optionally for one customer.
    pub async fn list(&self, filter: &TransactionFilter) -> DbResult<Vec<Transaction>> {
        let rows = filter::transaction_listing(filter)
            .build_query_as::<TransactionRow>()
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Transaction::try_from).collect()
    }

    /// Fetches one transaction by id.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Transaction>> {
        let row = sqlx::query_as::<_, TransactionRow>(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Transaction::try_from).transpose()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::{customer, database, product};
    use crate::retry::{retry_on_transient, RetryConfig};
    use crate::{Database, DbConfig};
    use till_core::query::SortOrder;
    use till_core::Money;

    fn order(customer_id: &str, lines: Vec<(&str, i64)>, paid: i64, change: i64) -> CheckoutOrder {
        CheckoutOrder {
            customer_id: customer_id.to_string(),
            lines: lines
                .into_iter()
                .map(|(product_id, quantity)| OrderLine {
                    product_id: product_id.to_string(),
                    quantity,
                })
                .collect(),
            paid: Money::from_minor(paid),
            change: Money::from_minor(change),
        }
    }

    async fn stock_of(db: &Database, id: &str) -> i64 {
        db.products().get_by_id(id).await.unwrap().unwrap().stock
    }

    async fn transaction_count(db: &Database) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM transactions")
            .fetch_one(db.pool())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_commit_decrements_stock_and_records() {
        let db = database().await;
        let buyer = customer("+628123456789", "Budi Santoso");
        let tee = product("Basic Tee", 10, 50_000);
        let cap = product("Cap", 4, 20_000);
        db.customers().insert(&buyer).await.unwrap();
        db.products().insert(&tee).await.unwrap();
        db.products().insert(&cap).await.unwrap();

        let tx = db
            .transactions()
            .commit_checkout(&order(&buyer.id, vec![(&tee.id, 2), (&cap.id, 1)], 130_000, 10_000))
            .await
            .unwrap();

        assert_eq!(tx.customer_id, buyer.id);
        assert_eq!(tx.paid, 130_000);
        assert_eq!(tx.change, 10_000);
        assert_eq!(stock_of(&db, &tee.id).await, 8);
        assert_eq!(stock_of(&db, &cap.id).await, 3);

        let stored = db
            .transactions()
            .get_by_id(&tx.transaction_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.product_details, tx.product_details);
    }

    #[tokio::test]
    async fn test_duplicate_lines_are_summed() {
        let db = database().await;
        let buyer = customer("+628123456789", "Budi Santoso");
        let tee = product("Basic Tee", 3, 100);
        db.customers().insert(&buyer).await.unwrap();
        db.products().insert(&tee).await.unwrap();

        let err = db
            .transactions()
            .commit_checkout(&order(&buyer.id, vec![(&tee.id, 2), (&tee.id, 2)], 400, 0))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(CoreError::InsufficientStock { requested: 4, .. })
        ));
        assert_eq!(stock_of(&db, &tee.id).await, 3);
    }

    #[tokio::test]
    async fn test_failed_checkout_writes_nothing() {
        let db = database().await;
        let buyer = customer("+628123456789", "Budi Santoso");
        let tee = product("Basic Tee", 10, 50_000);
        db.customers().insert(&buyer).await.unwrap();
        db.products().insert(&tee).await.unwrap();

        let err = db
            .transactions()
            .commit_checkout(&order(&buyer.id, vec![(&tee.id, 1)], 40_000, 0))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::PaidNotEnough { .. })));

        let err = db
            .transactions()
            .commit_checkout(&order(&buyer.id, vec![(&tee.id, 1)], 60_000, 5_000))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::IncorrectChange { .. })));

        assert_eq!(stock_of(&db, &tee.id).await, 10);
        assert_eq!(transaction_count(&db).await, 0);
    }

    #[tokio::test]
    async fn test_unknown_customer_and_product() {
        let db = database().await;
        let buyer = customer("+628123456789", "Budi Santoso");
        let tee = product("Basic Tee", 10, 100);
        db.customers().insert(&buyer).await.unwrap();
        db.products().insert(&tee).await.unwrap();

        let err = db
            .transactions()
            .commit_checkout(&order("nobody", vec![(&tee.id, 1)], 100, 0))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::CustomerNotFound(_))));

        let err = db
            .transactions()
            .commit_checkout(&order(&buyer.id, vec![(&tee.id, 1), ("ghost", 1)], 200, 0))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::ProductNotFound(ref id)) if id == "ghost"));
        assert_eq!(stock_of(&db, &tee.id).await, 10);
    }

    #[tokio::test]
    async fn test_list_by_customer_and_order() {
        let db = database().await;
        let a = customer("+628111111111", "Budi Santoso");
        let b = customer("+628222222222", "Siti Aminah");
        let tee = product("Basic Tee", 10, 100);
        db.customers().insert(&a).await.unwrap();
        db.customers().insert(&b).await.unwrap();
        db.products().insert(&tee).await.unwrap();

        let first = db
            .transactions()
            .commit_checkout(&order(&a.id, vec![(&tee.id, 1)], 100, 0))
            .await
            .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = db
            .transactions()
            .commit_checkout(&order(&a.id, vec![(&tee.id, 2)], 200, 0))
            .await
            .unwrap();
        db.transactions()
            .commit_checkout(&order(&b.id, vec![(&tee.id, 1)], 100, 0))
            .await
            .unwrap();

        let only_a = TransactionFilter {
            customer_id: Some(a.id.clone()),
            ..Default::default()
        };
        let listed = db.transactions().list(&only_a).await.unwrap();
        let ids: Vec<&str> = listed.iter().map(|t| t.transaction_id.as_str()).collect();
        assert_eq!(ids, vec![second.transaction_id.as_str(), first.transaction_id.as_str()]);

        let oldest_first = TransactionFilter {
            customer_id: Some(a.id.clone()),
            created_order: SortOrder::Asc,
            ..Default::default()
        };
        let listed = db.transactions().list(&oldest_first).await.unwrap();
        assert_eq!(listed[0].transaction_id, first.transaction_id);

        let all = db.transactions().list(&TransactionFilter::default()).await.unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn test_concurrent_checkouts_never_oversell() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(DbConfig::new(dir.path().join("till.db")).max_connections(4))
            .await
            .unwrap();

        let buyer = customer("+628123456789", "Budi Santoso");
        let tee = product("Basic Tee", 3, 100);
        db.customers().insert(&buyer).await.unwrap();
        db.products().insert(&tee).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..8 {
            let db = db.clone();
            let order = order(&buyer.id, vec![(&tee.id, 1)], 100, 0);
            handles.push(tokio::spawn(async move {
                let config = RetryConfig::with_max_attempts(20);
                let repo = db.transactions();
                retry_on_transient(&config, |_| repo.commit_checkout(&order)).await
            }));
        }

        let mut sold = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => sold += 1,
                Err(DbError::Domain(CoreError::InsufficientStock { .. })) => {}
                Err(other) => panic!("unexpected error: {other:?}"),
            }
        }

        assert_eq!(sold, 3);
        assert_eq!(stock_of(&db, &tee.id).await, 0);
        assert_eq!(transaction_count(&db).await, 3);
    }

    #[tokio::test]
    async fn test_concurrent_checkouts_with_ample_stock_all_commit() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(DbConfig::new(dir.path().join("till.db")).max_connections(5))
            .await
            .unwrap();

        let buyer = customer("+628123456789", "Budi Santoso");
        let tee = product("Basic Tee", 1_000, 100);
        db.customers().insert(&buyer).await.unwrap();
        db.products().insert(&tee).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..20 {
            let db = db.clone();
            let order = order(&buyer.id, vec![(&tee.id, 1)], 100, 0);
            handles.push(tokio::spawn(async move {
                let repo = db.transactions();
                retry_on_transient(&RetryConfig::default(), |_| repo.commit_checkout(&order)).await
            }));
        }

        for handle in handles {
            if let Err(err) = handle.await.unwrap() {
                panic!("checkout failed under contention: {err:?}");
            }
        }

        assert_eq!(stock_of(&db, &tee.id).await, 980);
        assert_eq!(transaction_count(&db).await, 20);
    }
}
