//! # In-Memory Store
//!
//! A [`Store`] backed by plain collections behind one async mutex. Used by the
//! API integration tests and for running the server without a database file.
//!
//! ## Atomicity
//! ```text
//! commit_checkout ── lock ──► read catalog ─► prepare_checkout ─► apply ── unlock
//!                    │                                               │
//!                    └──────── no other operation interleaves ───────┘
//! ```
//!
//! The whole commit runs under the lock, so a failed rule leaves every
//! collection untouched and concurrent checkouts are serialized.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::store::{CustomerStore, ProductStore, StaffStore, Store, TransactionStore};
use till_core::checkout;
use till_core::query::{CustomerFilter, ProductFilter, TransactionFilter};
use till_core::{CheckoutOrder, CoreError, Customer, Product, Staff, Transaction};

#[derive(Debug, Default)]
struct State {
    customers: HashMap<String, Customer>,
    products: HashMap<String, Product>,
    staff: HashMap<String, Staff>,
    transactions: Vec<Transaction>,
}

/// Process-local store; contents vanish with the value.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CustomerStore for MemoryStore {
    async fn insert_customer(&self, customer: &Customer) -> DbResult<()> {
        let mut state = self.state.lock().await;
        if state
            .customers
            .values()
            .any(|c| c.phone_number == customer.phone_number)
        {
            return Err(DbError::duplicate(
                "customers.phone_number",
                &customer.phone_number,
            ));
        }
        state.customers.insert(customer.id.clone(), customer.clone());
        Ok(())
    }

    async fn customer_by_id(&self, id: &str) -> DbResult<Option<Customer>> {
        Ok(self.state.lock().await.customers.get(id).cloned())
    }

    async fn customer_by_phone(&self, phone_number: &str) -> DbResult<Option<Customer>> {
        let state = self.state.lock().await;
        Ok(state
            .customers
            .values()
            .find(|c| c.phone_number == phone_number)
            .cloned())
    }

    async fn list_customers(&self, filter: &CustomerFilter) -> DbResult<Vec<Customer>> {
        let state = self.state.lock().await;
        let mut found: Vec<Customer> = state
            .customers
            .values()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect();
        found.sort_by(|a, b| filter.compare(a, b));
        Ok(filter.page.slice(found))
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn insert_product(&self, product: &Product) -> DbResult<()> {
        let mut state = self.state.lock().await;
        if state.products.contains_key(&product.id) {
            return Err(DbError::duplicate("products.id", &product.id));
        }
        state.products.insert(product.id.clone(), product.clone());
        Ok(())
    }

    async fn product_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        Ok(self.state.lock().await.products.get(id).cloned())
    }

    async fn products_by_ids(&self, ids: &[String]) -> DbResult<Vec<Product>> {
        let state = self.state.lock().await;
        Ok(ids
            .iter()
            .filter_map(|id| state.products.get(id).cloned())
            .collect())
    }

    async fn update_product(&self, product: &Product) -> DbResult<()> {
        let mut state = self.state.lock().await;
        match state.products.get_mut(&product.id) {
            Some(existing) => {
                let created_at = existing.created_at;
                *existing = Product {
                    created_at,
                    ..product.clone()
                };
                Ok(())
            }
            None => Err(DbError::not_found("Product", &product.id)),
        }
    }

    async fn delete_product(&self, id: &str) -> DbResult<()> {
        match self.state.lock().await.products.remove(id) {
            Some(_) => Ok(()),
            None => Err(DbError::not_found("Product", id)),
        }
    }

    async fn list_products(&self, filter: &ProductFilter) -> DbResult<Vec<Product>> {
        let state = self.state.lock().await;
        let mut found: Vec<Product> = state
            .products
            .values()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();
        found.sort_by(|a, b| filter.compare(a, b));
        Ok(filter.page.slice(found))
    }
}

#[async_trait]
impl StaffStore for MemoryStore {
    async fn insert_staff(&self, staff: &Staff) -> DbResult<()> {
        let mut state = self.state.lock().await;
        if state.staff.contains_key(&staff.phone_number) {
            return Err(DbError::duplicate("staff.phone_number", &staff.phone_number));
        }
        state.staff.insert(staff.phone_number.clone(), staff.clone());
        Ok(())
    }

    async fn staff_by_phone(&self, phone_number: &str) -> DbResult<Option<Staff>> {
        Ok(self.state.lock().await.staff.get(phone_number).cloned())
    }
}

#[async_trait]
impl TransactionStore for MemoryStore {
    async fn commit_checkout(&self, order: &CheckoutOrder) -> DbResult<Transaction> {
        let mut state = self.state.lock().await;

        if !state.customers.contains_key(&order.customer_id) {
            return Err(CoreError::CustomerNotFound(order.customer_id.clone()).into());
        }

        let catalog: HashMap<String, Product> = checkout::distinct_product_ids(&order.lines)
            .into_iter()
            .filter_map(|id| state.products.get(&id).map(|p| (id, p.clone())))
            .collect();

        let plan = checkout::prepare_checkout(order, &catalog)?;

        for decrement in plan.decrements {
            if let Some(product) = state.products.get_mut(&decrement.product_id) {
                product.stock = decrement.new_stock;
            }
        }

        let transaction = Transaction {
            transaction_id: Uuid::new_v4().to_string(),
            customer_id: order.customer_id.clone(),
            product_details: order.lines.clone(),
            paid: order.paid.minor(),
            change: order.change.minor(),
            created_at: Utc::now(),
        };
        state.transactions.push(transaction.clone());

        Ok(transaction)
    }

    async fn list_transactions(&self, filter: &TransactionFilter) -> DbResult<Vec<Transaction>> {
        let state = self.state.lock().await;
        let mut found: Vec<Transaction> = state
            .transactions
            .iter()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect();
        found.sort_by(|a, b| filter.compare(a, b));
        Ok(filter.page.slice(found))
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use till_core::{Category, Money, OrderLine};

    fn customer(phone: &str) -> Customer {
        Customer {
            id: Uuid::new_v4().to_string(),
            phone_number: phone.to_string(),
            name: "Budi Santoso".to_string(),
            created_at: Utc::now(),
        }
    }

    fn product(stock: i64, price: i64) -> Product {
        Product {
            id: Uuid::new_v4().to_string(),
            name: "Iced Tea".to_string(),
            sku: "TEA-01".to_string(),
            category: Category::Beverages,
            stock,
            price,
            image_url: "https://cdn.example.com/tea.png".to_string(),
            notes: "Chilled".to_string(),
            is_available: true,
            location: "Fridge 1".to_string(),
            created_at: Utc::now(),
        }
    }

    fn order(customer_id: &str, product_id: &str, quantity: i64, paid: i64) -> CheckoutOrder {
        CheckoutOrder {
            customer_id: customer_id.to_string(),
            lines: vec![OrderLine {
                product_id: product_id.to_string(),
                quantity,
            }],
            paid: Money::from_minor(paid),
            change: Money::zero(),
        }
    }

    #[tokio::test]
    async fn test_duplicate_customer_phone() {
        let store = MemoryStore::new();
        store.insert_customer(&customer("+628123456789")).await.unwrap();

        let err = store
            .insert_customer(&customer("+628123456789"))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_checkout_applies_and_rejects_atomically() {
        let store = MemoryStore::new();
        let buyer = customer("+628123456789");
        let tea = product(5, 10);
        store.insert_customer(&buyer).await.unwrap();
        store.insert_product(&tea).await.unwrap();

        store
            .commit_checkout(&order(&buyer.id, &tea.id, 2, 20))
            .await
            .unwrap();
        assert_eq!(store.product_by_id(&tea.id).await.unwrap().unwrap().stock, 3);

        let err = store
            .commit_checkout(&order(&buyer.id, &tea.id, 4, 40))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(CoreError::InsufficientStock { .. })
        ));
        assert_eq!(store.product_by_id(&tea.id).await.unwrap().unwrap().stock, 3);

        let history = store
            .list_transactions(&TransactionFilter::default())
            .await
            .unwrap();
        assert_eq!(history.len(), 1);
    }

    #[tokio::test]
    async fn test_update_keeps_created_at_and_delete() {
        let store = MemoryStore::new();
        let tea = product(5, 10);
        store.insert_product(&tea).await.unwrap();

        let mut changed = tea.clone();
        changed.price = 99;
        changed.created_at = Utc::now() + chrono::Duration::days(1);
        store.update_product(&changed).await.unwrap();

        let loaded = store.product_by_id(&tea.id).await.unwrap().unwrap();
        assert_eq!(loaded.price, 99);
        assert_eq!(loaded.created_at, tea.created_at);

        store.delete_product(&tea.id).await.unwrap();
        assert!(matches!(
            store.delete_product(&tea.id).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_concurrent_checkouts_never_oversell() {
        let store = Arc::new(MemoryStore::new());
        let buyer = customer("+628123456789");
        let tea = product(10, 1);
        store.insert_customer(&buyer).await.unwrap();
        store.insert_product(&tea).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..25 {
            let store = Arc::clone(&store);
            let order = order(&buyer.id, &tea.id, 1, 1);
            handles.push(tokio::spawn(async move { store.commit_checkout(&order).await }));
        }

        let mut sold = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                sold += 1;
            }
        }

        assert_eq!(sold, 10);
        assert_eq!(store.product_by_id(&tea.id).await.unwrap().unwrap().stock, 0);
    }
}
