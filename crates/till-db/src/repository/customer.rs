//! # Customer Repository
//!
//! Registration, lookup and listing of customers. Customers are never
//! updated or deleted, so transactions can always resolve their owner.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::filter::{self, CUSTOMER_COLUMNS};
use till_core::query::CustomerFilter;
use till_core::Customer;

/// Repository for customer database operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    /// Creates a new CustomerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Inserts a new customer.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - Phone number already registered
    pub async fn insert(&self, customer: &Customer) -> DbResult<()> {
        debug!(id = %customer.id, "Inserting customer");

        sqlx::query(
            "INSERT INTO customers (id, phone_number, name, created_at) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(&customer.id)
        .bind(&customer.phone_number)
        .bind(&customer.name)
        .bind(customer.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| DbError::from(e).with_value(&customer.phone_number))?;

        Ok(())
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    pub async fn get_by_phone(&self, phone_number: &str) -> DbResult<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE phone_number = ?1"
        ))
        .bind(phone_number)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Lists customers newest first.
    pub async fn list(&self, filter: &CustomerFilter) -> DbResult<Vec<Customer>> {
        let customers = filter::customer_listing(filter)
            .build_query_as::<Customer>()
            .fetch_all(&self.pool)
            .await?;

        Ok(customers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::{customer, database, timestamp};

    #[tokio::test]
    async fn test_insert_and_lookup() {
        let db = database().await;
        let budi = customer("+628123456789", "Budi Santoso");
        db.customers().insert(&budi).await.unwrap();

        let by_id = db.customers().get_by_id(&budi.id).await.unwrap();
        assert_eq!(by_id.as_ref(), Some(&budi));

        let by_phone = db.customers().get_by_phone("+628123456789").await.unwrap();
        assert_eq!(by_phone, Some(budi));
    }

    #[tokio::test]
    async fn test_duplicate_phone() {
        let db = database().await;
        db.customers()
            .insert(&customer("+628123456789", "Budi Santoso"))
            .await
            .unwrap();

        let err = db
            .customers()
            .insert(&customer("+628123456789", "Other Person"))
            .await
            .unwrap_err();

        match err {
            DbError::UniqueViolation { field, value } => {
                assert_eq!(field, "customers.phone_number");
                assert_eq!(value, "+628123456789");
            }
            other => panic!("expected UniqueViolation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_list_filters() {
        let db = database().await;
        let mut old = customer("+628111111111", "Budi Santoso");
        old.created_at = timestamp(60);
        let new = customer("+628222222222", "Siti Aminah");
        db.customers().insert(&old).await.unwrap();
        db.customers().insert(&new).await.unwrap();

        let all = db.customers().list(&CustomerFilter::default()).await.unwrap();
        assert_eq!(all, vec![new.clone(), old.clone()]);

        let by_name = CustomerFilter {
            name: Some("budi".to_string()),
            ..Default::default()
        };
        assert_eq!(db.customers().list(&by_name).await.unwrap(), vec![old]);

        let by_phone = CustomerFilter {
            phone_number: Some("2222".to_string()),
            ..Default::default()
        };
        assert_eq!(db.customers().list(&by_phone).await.unwrap(), vec![new]);
    }
}
