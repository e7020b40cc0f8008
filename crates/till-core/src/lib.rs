//! # till-core: Pure Business Logic for Till
//!
//! Everything here is a pure function over plain data: the domain types,
//! integer money, request validation rules, the checkout arithmetic, and the
//! semantics of the listing filters. Storage and HTTP live in other crates.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Till Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  till-api (axum HTTP server)                    │   │
//! │  │   /v1/staff  /v1/customer  /v1/product  /v1/product/checkout    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ till-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │ checkout  │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │ price     │  │  phone    │  │   │
//! │  │   │ Customer  │  │           │  │ settle    │  │  product  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                         ┌───────────┐                          │   │
//! │  │                         │   query   │  listing filters         │   │
//! │  │                         └───────────┘                          │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                   till-db (Database Layer)                      │   │
//! │  │        SQLite repositories, storage traits, memory store        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Customer, Staff, Transaction)
//! - [`money`] - Money type with integer arithmetic
//! - [`error`] - Domain error types
//! - [`validation`] - Per-field request rules
//! - [`checkout`] - Order pricing, payment settlement, stock planning
//! - [`query`] - Typed listing filters and pagination
//!
//! ## Example Usage
//!
//! ```rust
//! use till_core::money::Money;
//!
//! let price = Money::from_minor(1000);
//! let line = price.checked_mul_quantity(5).unwrap();
//! assert_eq!(line.minor(), 5000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod checkout;
pub mod error;
pub mod money;
pub mod query;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Upper bound for a product's stock level.
pub const MAX_PRODUCT_STOCK: i64 = 100_000;

/// Default page size for customer listings.
pub const DEFAULT_CUSTOMER_LIMIT: i64 = 10;

/// Default page size for product listings.
pub const DEFAULT_PRODUCT_LIMIT: i64 = 5;

/// Default page size for transaction history.
pub const DEFAULT_TRANSACTION_LIMIT: i64 = 5;
