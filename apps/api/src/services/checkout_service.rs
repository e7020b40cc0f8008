//! Checkout and transaction history.
//!
//! ## Checkout Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Request shape        customerId, ≥1 line, quantity ≥ 1,            │
//! │                          paid ≥ 0, change ≥ 0                  → 400   │
//! │  2. Customer             malformed or unknown id               → 404   │
//! │  3. Order                one batched product read, price_order → 400/404│
//! │  4. Payment              settle_payment                        → 400   │
//! │  5. Commit               store.commit_checkout, which re-runs 2-4      │
//! │                          against fresh state inside its transaction    │
//! │                          WriteConflict / Busy → retry with backoff     │
//! │                          retries exhausted                     → 500   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Steps 2-4 fail fast without opening a storage transaction.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;
use tracing::debug;

use crate::error::ApiResult;
use till_core::checkout::{distinct_product_ids, price_order, settle_payment, validate_lines};
use till_core::query::TransactionFilter;
use till_core::validation::validate_uuid;
use till_core::{CheckoutOrder, CoreError, Money, OrderLine, Product, Transaction, ValidationError};
use till_db::{retry_on_transient, RetryConfig, Store};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub customer_id: Option<String>,
    pub product_details: Option<Vec<OrderLine>>,
    pub paid: Option<i64>,
    pub change: Option<i64>,
}

fn non_negative(field: &str, value: Option<i64>) -> Result<Money, ValidationError> {
    match value {
        None => Err(ValidationError::Required {
            field: field.to_string(),
        }),
        Some(v) if v < 0 => Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX,
        }),
        Some(v) => Ok(Money::from_minor(v)),
    }
}

impl CheckoutRequest {
    /// Checks the request shape and builds the domain order.
    pub fn into_order(self) -> ApiResult<CheckoutOrder> {
        let customer_id = self
            .customer_id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| ValidationError::Required {
                field: "customerId".to_string(),
            })?;

        let lines = self.product_details.unwrap_or_default();
        validate_lines(&lines)?;

        Ok(CheckoutOrder {
            customer_id,
            lines,
            paid: non_negative("paid", self.paid)?,
            change: non_negative("change", self.change)?,
        })
    }
}

#[derive(Clone)]
pub struct CheckoutService {
    store: Arc<dyn Store>,
    retry: RetryConfig,
}

impl CheckoutService {
    pub fn new(store: Arc<dyn Store>, retry: RetryConfig) -> Self {
        CheckoutService { store, retry }
    }

    pub async fn checkout(&self, req: CheckoutRequest) -> ApiResult<Transaction> {
        let order = req.into_order()?;

        self.validate_customer(&order.customer_id).await?;
        let total = self.validate_order(&order.lines).await?;
        settle_payment(total, order.paid, order.change)?;

        debug!(customer_id = %order.customer_id, %total, "Checkout pre-validated");

        let transaction = retry_on_transient(&self.retry, |attempt| {
            debug!(attempt, "Committing checkout");
            self.store.commit_checkout(&order)
        })
        .await?;

        Ok(transaction)
    }

    /// Resolves the customer; malformed ids are reported as not found.
    async fn validate_customer(&self, customer_id: &str) -> ApiResult<()> {
        if validate_uuid(customer_id).is_err()
            || self.store.customer_by_id(customer_id).await?.is_none()
        {
            return Err(CoreError::CustomerNotFound(customer_id.to_string()).into());
        }
        Ok(())
    }

    /// Prices the order against one batched catalog read. Never mutates.
    async fn validate_order(&self, lines: &[OrderLine]) -> ApiResult<Money> {
        let ids = distinct_product_ids(lines);
        let products = if ids.is_empty() {
            Vec::new()
        } else {
            self.store.products_by_ids(&ids).await?
        };

        let catalog: HashMap<String, Product> = products
            .into_iter()
            .map(|product| (product.id.clone(), product))
            .collect();

        Ok(price_order(lines, &catalog)?)
    }

    pub async fn history(&self, filter: &TransactionFilter) -> ApiResult<Vec<Transaction>> {
        Ok(self.store.list_transactions(filter).await?)
    }
}
