//! # Repository Module
//!
//! SQLite repository implementations for Till.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Service (till-api)                                                    │
//! │       │                                                                 │
//! │       │  store.list_products(&filter)                                  │
//! │       ▼                                                                 │
//! │  impl ProductStore for Database  (store.rs)                            │
//! │       │                                                                 │
//! │       │  db.products().list(&filter)                                   │
//! │       ▼                                                                 │
//! │  ProductRepository (this module)                                       │
//! │       │                                                                 │
//! │       │  filter::product_listing → QueryBuilder → fetch_all            │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Catalog CRUD and listing
//! - [`customer::CustomerRepository`] - Customer registration and listing
//! - [`staff::StaffRepository`] - Staff credentials
//! - [`transaction::TransactionRepository`] - Atomic checkout and history

pub mod customer;
pub mod product;
pub mod staff;
pub mod transaction;
