//! # till-api
//!
//! HTTP server for the Till point-of-sale backend.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           till-api                                      │
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────────┐│
//! │  │  StaffService  │  │ ProductService │  │  CheckoutService           ││
//! │  │                │  │                │  │                            ││
//! │  │ • register     │  │ • create       │  │ • checkout (retrying)      ││
//! │  │ • login        │  │ • update       │  │ • history                  ││
//! │  │                │  │ • delete, list │  │                            ││
//! │  └────────────────┘  └────────────────┘  └────────────────────────────┘│
//! │                                                                         │
//! │  ┌────────────────┐                                                    │
//! │  │CustomerService │                                                    │
//! │  │ • register     │                                                    │
//! │  │ • list         │                                                    │
//! │  └────────────────┘                                                    │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                      Infrastructure                               │  │
//! │  │                                                                   │  │
//! │  │  ┌──────────────┐  ┌──────────────┐  ┌──────────────────────────┐│  │
//! │  │  │ Arc<dyn      │  │  axum +      │  │    JWT Auth              ││  │
//! │  │  │   Store>     │  │  tower-http  │  │                          ││  │
//! │  │  │ SQLite/memory│  │ trace,timeout│  │ HS256, 10 min, argon2    ││  │
//! │  │  └──────────────┘  └──────────────┘  └──────────────────────────┘│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables (or the same keys in `till.toml`):
//! - `TILL_HTTP_HOST` / `TILL_HTTP_PORT` - listener (default: 0.0.0.0:8080)
//! - `TILL_DATABASE_PATH` - SQLite file or `:memory:` (default: till.db)
//! - `TILL_DB_MAX_CONNECTIONS` - pool size (default: 5)
//! - `TILL_JWT_SECRET` - secret for JWT signing
//! - `TILL_REQUEST_TIMEOUT_SECS` - per-request bound (default: 30)
//! - `TILL_CHECKOUT_MAX_ATTEMPTS` - commit retry budget (default: 3)

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod response;
pub mod routes;
pub mod services;
pub mod state;

// Re-exports
pub use config::AppConfig;
pub use error::{ApiError, ApiResult};
pub use routes::router;
pub use state::AppState;
