//! Shared application state.
//!
//! ```text
//! AppState (Clone, one Arc per field)
//!   ├── config     AppConfig
//!   ├── jwt        JwtManager        ◄── AuthenticatedStaff extractor
//!   ├── store      Arc<dyn Store>    ◄── health check
//!   └── services   staff / products / customers / checkout
//! ```

use std::sync::Arc;

use till_db::{RetryConfig, Store};

use crate::auth::{JwtManager, ACCESS_TOKEN_LIFETIME_SECS};
use crate::config::AppConfig;
use crate::services::{CheckoutService, CustomerService, ProductService, StaffService};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub jwt: Arc<JwtManager>,
    pub store: Arc<dyn Store>,
    pub staff: StaffService,
    pub products: ProductService,
    pub customers: CustomerService,
    pub checkout: CheckoutService,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn Store>) -> Self {
        let jwt = Arc::new(JwtManager::new(
            &config.jwt_secret,
            ACCESS_TOKEN_LIFETIME_SECS,
        ));
        let retry = RetryConfig::with_max_attempts(config.checkout_max_attempts);

        AppState {
            staff: StaffService::new(store.clone(), jwt.clone()),
            products: ProductService::new(store.clone()),
            customers: CustomerService::new(store.clone()),
            checkout: CheckoutService::new(store.clone(), retry),
            config: Arc::new(config),
            jwt,
            store,
        }
    }
}
