//! Customer registration and lookup.

use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::error::ApiResult;
use till_core::query::CustomerFilter;
use till_core::validation::{validate_person_name, validate_phone_number};
use till_core::{CoreError, Customer, ValidationError};
use till_db::Store;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterCustomerRequest {
    pub phone_number: Option<String>,
    pub name: Option<String>,
}

#[derive(Clone)]
pub struct CustomerService {
    store: Arc<dyn Store>,
}

impl CustomerService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        CustomerService { store }
    }

    /// Registers a customer. A taken phone number is a conflict; the
    /// existing record is left as is.
    pub async fn register(&self, req: RegisterCustomerRequest) -> ApiResult<Customer> {
        let phone_number = req.phone_number.unwrap_or_default();
        let name = req.name.ok_or_else(|| ValidationError::Required {
            field: "name".to_string(),
        })?;

        validate_phone_number(&phone_number)?;
        validate_person_name(&name)?;

        if self.store.customer_by_phone(&phone_number).await?.is_some() {
            return Err(CoreError::PhoneNumberTaken(phone_number).into());
        }

        let customer = Customer {
            id: Uuid::new_v4().to_string(),
            phone_number,
            name,
            created_at: Utc::now(),
        };
        self.store.insert_customer(&customer).await?;

        info!(customer_id = %customer.id, "Customer registered");
        Ok(customer)
    }

    pub async fn list(&self, filter: &CustomerFilter) -> ApiResult<Vec<Customer>> {
        Ok(self.store.list_customers(filter).await?)
    }
}
