//! # Listing Filters
//!
//! Typed filter, sort and pagination parameters for the three listing
//! endpoints. Each filter also carries its own in-process semantics
//! (`matches` / `compare`) so that every storage backend agrees with the SQL
//! one on what a filter means.
//!
//! ```text
//! query string ──► *Filter (this module) ──┬──► till-db::filter  (SQL + binds)
//!                                          └──► MemoryStore      (matches/compare)
//! ```

use std::cmp::Ordering;

use crate::types::{Category, Customer, Product, Transaction};
use crate::{DEFAULT_CUSTOMER_LIMIT, DEFAULT_PRODUCT_LIMIT, DEFAULT_TRANSACTION_LIMIT};

// =============================================================================
// Sorting & Paging
// =============================================================================

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// Parses `asc` / `desc` (any case); anything else is `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "asc" => Some(SortOrder::Asc),
            "desc" => Some(SortOrder::Desc),
            _ => None,
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }

    /// Applies the direction to an ascending comparison.
    pub fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

/// Parses `true` / `false`; anything else is `None`.
pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Limit/offset pair with per-endpoint defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl Page {
    /// Non-positive limits fall back to `default_limit`; negative offsets to 0.
    pub fn new(limit: Option<i64>, offset: Option<i64>, default_limit: i64) -> Self {
        Page {
            limit: limit.filter(|l| *l > 0).unwrap_or(default_limit),
            offset: offset.filter(|o| *o >= 0).unwrap_or(0),
        }
    }

    /// Slices an already-sorted sequence.
    pub fn slice<T>(&self, items: impl IntoIterator<Item = T>) -> Vec<T> {
        items
            .into_iter()
            .skip(self.offset as usize)
            .take(self.limit as usize)
            .collect()
    }
}

/// ASCII-only case folding, the same as SQLite's `LOWER()`.
fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack
        .to_ascii_lowercase()
        .contains(&needle.to_ascii_lowercase())
}

// =============================================================================
// Products
// =============================================================================

/// `GET /v1/product` parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductFilter {
    pub id: Option<String>,
    /// Case-insensitive substring.
    pub name: Option<String>,
    pub category: Option<Category>,
    /// Exact match.
    pub sku: Option<String>,
    pub is_available: Option<bool>,
    /// `true`: stock > 0, `false`: stock = 0.
    pub in_stock: Option<bool>,
    /// When set, price is the primary sort key.
    pub price_order: Option<SortOrder>,
    pub created_order: SortOrder,
    pub page: Page,
}

impl Default for ProductFilter {
    fn default() -> Self {
        ProductFilter {
            id: None,
            name: None,
            category: None,
            sku: None,
            is_available: None,
            in_stock: None,
            price_order: None,
            created_order: SortOrder::Desc,
            page: Page::new(None, None, DEFAULT_PRODUCT_LIMIT),
        }
    }
}

impl ProductFilter {
    pub fn matches(&self, product: &Product) -> bool {
        if self.id.as_deref().is_some_and(|id| id != product.id) {
            return false;
        }
        if self
            .name
            .as_deref()
            .is_some_and(|name| !contains_ignore_case(&product.name, name))
        {
            return false;
        }
        if self.category.is_some_and(|c| c != product.category) {
            return false;
        }
        if self.sku.as_deref().is_some_and(|sku| sku != product.sku) {
            return false;
        }
        if self.is_available.is_some_and(|a| a != product.is_available) {
            return false;
        }
        if let Some(in_stock) = self.in_stock {
            if in_stock != (product.stock > 0) {
                return false;
            }
        }
        true
    }

    pub fn compare(&self, a: &Product, b: &Product) -> Ordering {
        let by_price = match self.price_order {
            Some(order) => order.apply(a.price.cmp(&b.price)),
            None => Ordering::Equal,
        };
        by_price
            .then_with(|| self.created_order.apply(a.created_at.cmp(&b.created_at)))
            .then_with(|| a.id.cmp(&b.id))
    }
}

// =============================================================================
// Customers
// =============================================================================

/// `GET /v1/customer` parameters. Always newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerFilter {
    /// Case-insensitive substring.
    pub name: Option<String>,
    /// Substring.
    pub phone_number: Option<String>,
    pub page: Page,
}

impl Default for CustomerFilter {
    fn default() -> Self {
        CustomerFilter {
            name: None,
            phone_number: None,
            page: Page::new(None, None, DEFAULT_CUSTOMER_LIMIT),
        }
    }
}

impl CustomerFilter {
    pub fn matches(&self, customer: &Customer) -> bool {
        let name_ok = self
            .name
            .as_deref()
            .map_or(true, |name| contains_ignore_case(&customer.name, name));
        let phone_ok = self
            .phone_number
            .as_deref()
            .map_or(true, |phone| customer.phone_number.contains(phone));
        name_ok && phone_ok
    }

    pub fn compare(&self, a: &Customer, b: &Customer) -> Ordering {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| a.id.cmp(&b.id))
    }
}

// =============================================================================
// Transactions
// =============================================================================

/// `GET /v1/transaction` parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionFilter {
    pub customer_id: Option<String>,
    pub created_order: SortOrder,
    pub page: Page,
}

impl Default for TransactionFilter {
    fn default() -> Self {
        TransactionFilter {
            customer_id: None,
            created_order: SortOrder::Desc,
            page: Page::new(None, None, DEFAULT_TRANSACTION_LIMIT),
        }
    }
}

impl TransactionFilter {
    pub fn matches(&self, transaction: &Transaction) -> bool {
        self.customer_id
            .as_deref()
            .map_or(true, |id| id == transaction.customer_id)
    }

    pub fn compare(&self, a: &Transaction, b: &Transaction) -> Ordering {
        self.created_order
            .apply(a.created_at.cmp(&b.created_at))
            .then_with(|| a.transaction_id.cmp(&b.transaction_id))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn product(id: &str, name: &str, price: i64, stock: i64, age_secs: i64) -> Product {
        Product {
            id: id.to_string(),
            name: name.to_string(),
            sku: format!("SKU-{id}"),
            category: Category::Clothing,
            stock,
            price,
            image_url: "https://cdn.example.com/x.png".to_string(),
            notes: "n".to_string(),
            is_available: true,
            location: "A1".to_string(),
            created_at: Utc::now() - Duration::seconds(age_secs),
        }
    }

    #[test]
    fn test_page_defaults() {
        assert_eq!(Page::new(None, None, 5), Page { limit: 5, offset: 0 });
        assert_eq!(Page::new(Some(0), Some(-3), 10), Page { limit: 10, offset: 0 });
        assert_eq!(Page::new(Some(2), Some(4), 10), Page { limit: 2, offset: 4 });
        assert_eq!(Page { limit: 2, offset: 1 }.slice(1..=5), vec![2, 3]);
    }

    #[test]
    fn test_sort_order_parse() {
        assert_eq!(SortOrder::parse("ASC"), Some(SortOrder::Asc));
        assert_eq!(SortOrder::parse("desc"), Some(SortOrder::Desc));
        assert_eq!(SortOrder::parse("sideways"), None);
        assert_eq!(parse_flag("true"), Some(true));
        assert_eq!(parse_flag("yes"), None);
    }

    #[test]
    fn test_product_filter_matches() {
        let shirt = product("1", "Linen Shirt", 100, 0, 0);

        let filter = ProductFilter {
            name: Some("linen".to_string()),
            ..Default::default()
        };
        assert!(filter.matches(&shirt));

        let filter = ProductFilter {
            in_stock: Some(true),
            ..Default::default()
        };
        assert!(!filter.matches(&shirt));

        let filter = ProductFilter {
            in_stock: Some(false),
            sku: Some("SKU-1".to_string()),
            ..Default::default()
        };
        assert!(filter.matches(&shirt));
    }

    #[test]
    fn test_name_match_folds_ascii_only() {
        let eclair = product("1", "Éclair Box", 100, 1, 0);
        let by_name = |name: &str| ProductFilter {
            name: Some(name.to_string()),
            ..Default::default()
        };

        assert!(by_name("ÉCLAIR BOX").matches(&eclair));
        assert!(by_name("box").matches(&eclair));
        assert!(!by_name("éclair").matches(&eclair));
    }

    #[test]
    fn test_product_filter_sorting() {
        let mut items = vec![
            product("old-cheap", "a", 100, 1, 30),
            product("new-pricey", "b", 900, 1, 0),
            product("mid-cheap", "c", 100, 1, 10),
        ];

        let by_default = ProductFilter::default();
        items.sort_by(|a, b| by_default.compare(a, b));
        assert_eq!(items[0].id, "new-pricey");

        let by_price = ProductFilter {
            price_order: Some(SortOrder::Asc),
            ..Default::default()
        };
        items.sort_by(|a, b| by_price.compare(a, b));
        let ids: Vec<&str> = items.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["mid-cheap", "old-cheap", "new-pricey"]);
    }
}
