//! # Storage Traits
//!
//! One trait per entity plus the [`Store`] umbrella the API depends on.
//!
//! ```text
//!                     ┌────────────────────────┐
//!                     │   Arc<dyn Store>       │  (till-api services)
//!                     └───────────┬────────────┘
//!            ┌────────────────────┴────────────────────┐
//!            ▼                                         ▼
//!  ┌──────────────────────┐                ┌──────────────────────┐
//!  │ Database (SQLite)    │                │ MemoryStore          │
//!  │ repositories + CAS   │                │ Mutex<state>         │
//!  └──────────────────────┘                └──────────────────────┘
//! ```
//!
//! Both implementations run the same `till_core::checkout` functions, so a
//! business rule can never mean one thing in tests and another in production.

use async_trait::async_trait;
use till_core::query::{CustomerFilter, ProductFilter, TransactionFilter};
use till_core::{CheckoutOrder, Customer, Product, Staff, Transaction};

use crate::error::DbResult;
use crate::pool::Database;

#[async_trait]
pub trait CustomerStore: Send + Sync {
    /// Fails with `UniqueViolation` when the phone number is taken.
    async fn insert_customer(&self, customer: &Customer) -> DbResult<()>;

    async fn customer_by_id(&self, id: &str) -> DbResult<Option<Customer>>;

    async fn customer_by_phone(&self, phone_number: &str) -> DbResult<Option<Customer>>;

    async fn list_customers(&self, filter: &CustomerFilter) -> DbResult<Vec<Customer>>;
}

#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn insert_product(&self, product: &Product) -> DbResult<()>;

    async fn product_by_id(&self, id: &str) -> DbResult<Option<Product>>;

    /// One batched read. Unknown ids are simply absent from the result.
    async fn products_by_ids(&self, ids: &[String]) -> DbResult<Vec<Product>>;

    /// Replaces every mutable field; `NotFound` if the id does not exist.
    async fn update_product(&self, product: &Product) -> DbResult<()>;

    /// `NotFound` if the id does not exist.
    async fn delete_product(&self, id: &str) -> DbResult<()>;

    async fn list_products(&self, filter: &ProductFilter) -> DbResult<Vec<Product>>;
}

#[async_trait]
pub trait StaffStore: Send + Sync {
    /// Fails with `UniqueViolation` when the phone number is taken.
    async fn insert_staff(&self, staff: &Staff) -> DbResult<()>;

    async fn staff_by_phone(&self, phone_number: &str) -> DbResult<Option<Staff>>;
}

#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Atomically re-validates the order, decrements stock and records the
    /// transaction. On any error nothing is written.
    async fn commit_checkout(&self, order: &CheckoutOrder) -> DbResult<Transaction>;

    async fn list_transactions(&self, filter: &TransactionFilter) -> DbResult<Vec<Transaction>>;
}

/// Everything the API needs from storage.
#[async_trait]
pub trait Store: CustomerStore + ProductStore + StaffStore + TransactionStore {
    /// `true` if the backend can serve queries.
    async fn ping(&self) -> bool;
}

// =============================================================================
// SQLite Implementation
// =============================================================================

#[async_trait]
impl CustomerStore for Database {
    async fn insert_customer(&self, customer: &Customer) -> DbResult<()> {
        self.customers().insert(customer).await
    }

    async fn customer_by_id(&self, id: &str) -> DbResult<Option<Customer>> {
        self.customers().get_by_id(id).await
    }

    async fn customer_by_phone(&self, phone_number: &str) -> DbResult<Option<Customer>> {
        self.customers().get_by_phone(phone_number).await
    }

    async fn list_customers(&self, filter: &CustomerFilter) -> DbResult<Vec<Customer>> {
        self.customers().list(filter).await
    }
}

#[async_trait]
impl ProductStore for Database {
    async fn insert_product(&self, product: &Product) -> DbResult<()> {
        self.products().insert(product).await
    }

    async fn product_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        self.products().get_by_id(id).await
    }

    async fn products_by_ids(&self, ids: &[String]) -> DbResult<Vec<Product>> {
        self.products().get_many(ids).await
    }

    async fn update_product(&self, product: &Product) -> DbResult<()> {
        self.products().update(product).await
    }

    async fn delete_product(&self, id: &str) -> DbResult<()> {
        self.products().delete(id).await
    }

    async fn list_products(&self, filter: &ProductFilter) -> DbResult<Vec<Product>> {
        self.products().list(filter).await
    }
}

#[async_trait]
impl StaffStore for Database {
    async fn insert_staff(&self, staff: &Staff) -> DbResult<()> {
        self.staff().insert(staff).await
    }

    async fn staff_by_phone(&self, phone_number: &str) -> DbResult<Option<Staff>> {
        self.staff().get_by_phone(phone_number).await
    }
}

#[async_trait]
impl TransactionStore for Database {
    async fn commit_checkout(&self, order: &CheckoutOrder) -> DbResult<Transaction> {
        self.transactions().commit_checkout(order).await
    }

    async fn list_transactions(&self, filter: &TransactionFilter) -> DbResult<Vec<Transaction>> {
        self.transactions().list(filter).await
    }
}

#[async_trait]
impl Store for Database {
    async fn ping(&self) -> bool {
        Database::ping(self).await
    }
}
