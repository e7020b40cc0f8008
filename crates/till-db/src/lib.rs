//! # till-db: Storage Layer for Till
//!
//! SQLite storage via sqlx, an in-memory store with identical semantics, and
//! the traits the API uses to talk to either.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Till Data Flow                                 │
//! │                                                                         │
//! │  HTTP handler (till-api)                                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     till-db (THIS CRATE)                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   store.rs    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │               │    │               │    │  (embedded)  │  │   │
//! │  │   │ trait Store   │───►│ ProductRepo   │    │ 001_init.sql │  │   │
//! │  │   │ MemoryStore   │    │ CustomerRepo  │    │              │  │   │
//! │  │   │ retry.rs      │    │ StaffRepo     │    │              │  │   │
//! │  │   │               │    │ TransactionRepo│   │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database (WAL)                       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - SQLite repository implementations
//! - [`filter`] - Listing filters rendered as parameterized SQL
//! - [`store`] - Storage traits
//! - [`memory`] - In-memory store
//! - [`retry`] - Backoff for transient write failures
//!
//! ## Usage
//!
//! ```rust,ignore
//! use till_db::{Database, DbConfig, Store};
//!
//! let db = Database::new(DbConfig::new("till.db")).await?;
//! let store: Arc<dyn Store> = Arc::new(db);
//! let products = store.list_products(&ProductFilter::default()).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod filter;
pub mod memory;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod retry;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use memory::MemoryStore;
pub use pool::{Database, DbConfig, DbLocation};
pub use retry::{retry_on_transient, IsTransient, RetryConfig};
pub use store::{CustomerStore, ProductStore, StaffStore, Store, TransactionStore};

// Repository re-exports for convenience
pub use repository::customer::CustomerRepository;
pub use repository::product::ProductRepository;
pub use repository::staff::StaffRepository;
pub use repository::transaction::TransactionRepository;
