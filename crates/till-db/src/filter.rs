//! # Listing Query Builder
//!
//! Turns the typed filters from `till_core::query` into SQL. Every value a
//! client supplied is pushed as a bind parameter; only column names, fixed
//! operators and sort directions from closed enums are ever written into the
//! SQL text.
//!
//! ```text
//! ProductFilter { name: "shirt", in_stock: true, price_order: Asc, .. }
//!      │
//!      ▼  predicates()
//! [Like(name, "%shirt%"), Raw("stock > 0")]
//!      │
//!      ▼  render
//! SELECT … FROM products
//!  WHERE LOWER(name) LIKE ? ESCAPE '\' AND stock > 0
//!  ORDER BY price ASC, created_at DESC, id ASC
//!  LIMIT ? OFFSET ?                       binds: ["%shirt%", 5, 0]
//! ```
//!
//! Each call builds a fresh `QueryBuilder`; nothing is shared between
//! requests.

use sqlx::{QueryBuilder, Sqlite};
use till_core::query::{CustomerFilter, Page, ProductFilter, TransactionFilter};

pub(crate) const PRODUCT_COLUMNS: &str =
    "id, name, sku, category, stock, price, image_url, notes, is_available, location, created_at";

pub(crate) const CUSTOMER_COLUMNS: &str = "id, phone_number, name, created_at";

pub(crate) const TRANSACTION_COLUMNS: &str =
    "id, customer_id, product_details, paid_amount, change_amount, created_at";

// =============================================================================
// Predicates
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Value {
    Text(String),
    Bool(bool),
}

#[derive(Debug, Clone, PartialEq)]
enum Predicate {
    /// `column = ?`
    Eq(&'static str, Value),
    /// `LOWER(column) LIKE ?` with a lower-cased, escaped pattern.
    ContainsIgnoreCase(&'static str, String),
    /// `column LIKE ?` with an escaped pattern.
    Contains(&'static str, String),
    /// Fixed SQL with no parameters.
    Raw(&'static str),
}

/// Escapes LIKE wildcards so user text only ever matches literally.
fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn contains_pattern(raw: &str) -> String {
    format!("%{}%", escape_like(raw))
}

fn push_where(builder: &mut QueryBuilder<'static, Sqlite>, predicates: Vec<Predicate>) {
    for (index, predicate) in predicates.into_iter().enumerate() {
        builder.push(if index == 0 { " WHERE " } else { " AND " });

        match predicate {
            Predicate::Eq(column, value) => {
                builder.push(column).push(" = ");
                match value {
                    Value::Text(text) => builder.push_bind(text),
                    Value::Bool(flag) => builder.push_bind(flag),
                };
            }
            Predicate::ContainsIgnoreCase(column, pattern) => {
                builder
                    .push("LOWER(")
                    .push(column)
                    .push(") LIKE ")
                    .push_bind(pattern)
                    .push(" ESCAPE '\\'");
            }
            Predicate::Contains(column, pattern) => {
                builder
                    .push(column)
                    .push(" LIKE ")
                    .push_bind(pattern)
                    .push(" ESCAPE '\\'");
            }
            Predicate::Raw(sql) => {
                builder.push(sql);
            }
        }
    }
}

fn push_page(builder: &mut QueryBuilder<'static, Sqlite>, page: Page) {
    builder
        .push(" LIMIT ")
        .push_bind(page.limit)
        .push(" OFFSET ")
        .push_bind(page.offset);
}

// =============================================================================
// Products
// =============================================================================

fn product_predicates(filter: &ProductFilter) -> Vec<Predicate> {
    let mut predicates = Vec::new();

    if let Some(id) = &filter.id {
        predicates.push(Predicate::Eq("id", Value::Text(id.clone())));
    }
    if let Some(name) = &filter.name {
        predicates.push(Predicate::ContainsIgnoreCase(
            "name",
            contains_pattern(&name.to_ascii_lowercase()),
        ));
    }
    if let Some(category) = filter.category {
        predicates.push(Predicate::Eq(
            "category",
            Value::Text(category.as_str().to_string()),
        ));
    }
    if let Some(sku) = &filter.sku {
        predicates.push(Predicate::Eq("sku", Value::Text(sku.clone())));
    }
    if let Some(is_available) = filter.is_available {
        predicates.push(Predicate::Eq("is_available", Value::Bool(is_available)));
    }
    match filter.in_stock {
        Some(true) => predicates.push(Predicate::Raw("stock > 0")),
        Some(false) => predicates.push(Predicate::Raw("stock = 0")),
        None => {}
    }

    predicates
}

/// `GET /v1/product` query.
pub fn product_listing(filter: &ProductFilter) -> QueryBuilder<'static, Sqlite> {
    let mut builder = QueryBuilder::new(format!("SELECT {PRODUCT_COLUMNS} FROM products"));
    push_where(&mut builder, product_predicates(filter));

    builder.push(" ORDER BY ");
    if let Some(order) = filter.price_order {
        builder.push("price ").push(order.as_sql()).push(", ");
    }
    builder
        .push("created_at ")
        .push(filter.created_order.as_sql())
        .push(", id ASC");

    push_page(&mut builder, filter.page);
    builder
}

/// Batched lookup of products by id. `ids` must be non-empty.
pub fn products_by_ids(ids: &[String]) -> QueryBuilder<'static, Sqlite> {
    let mut builder = QueryBuilder::new(format!(
        "SELECT {PRODUCT_COLUMNS} FROM products WHERE id IN ("
    ));
    let mut separated = builder.separated(", ");
    for id in ids {
        separated.push_bind(id.clone());
    }
    separated.push_unseparated(")");
    builder
}

// =============================================================================
// Customers
// =============================================================================

/// `GET /v1/customer` query, newest first.
pub fn customer_listing(filter: &CustomerFilter) -> QueryBuilder<'static, Sqlite> {
    let mut predicates = Vec::new();
    if let Some(name) = &filter.name {
        predicates.push(Predicate::ContainsIgnoreCase(
            "name",
            contains_pattern(&name.to_ascii_lowercase()),
        ));
    }
    if let Some(phone) = &filter.phone_number {
        predicates.push(Predicate::Contains("phone_number", contains_pattern(phone)));
    }

    let mut builder = QueryBuilder::new(format!("SELECT {CUSTOMER_COLUMNS} FROM customers"));
    push_where(&mut builder, predicates);
    builder.push(" ORDER BY created_at DESC, id ASC");
    push_page(&mut builder, filter.page);
    builder
}

// =============================================================================
// Transactions
// =============================================================================

/// `GET /v1/transaction` query.
pub fn transaction_listing(filter: &TransactionFilter) -> QueryBuilder<'static, Sqlite> {
    let mut predicates = Vec::new();
    if let Some(customer_id) = &filter.customer_id {
        predicates.push(Predicate::Eq("customer_id", Value::Text(customer_id.clone())));
    }

    let mut builder =
        QueryBuilder::new(format!("SELECT {TRANSACTION_COLUMNS} FROM transactions"));
    push_where(&mut builder, predicates);
    builder
        .push(" ORDER BY created_at ")
        .push(filter.created_order.as_sql())
        .push(", id ASC");
    push_page(&mut builder, filter.page);
    builder
}

// =============================================================================
// Unit Tests
// =============================================================================
