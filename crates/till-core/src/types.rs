//! # Domain Types
//!
//! Core domain types used throughout Till.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    Customer     │   │     Staff       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  sku, category  │   │  phone_number   │   │  phone_number   │       │
//! │  │  stock, price   │   │  name           │   │  password_hash  │       │
//! │  └─────────────────┘   └────────┬────────┘   └─────────────────┘       │
//! │                                 │ customer_id                           │
//! │                        ┌────────▼────────┐   ┌─────────────────┐       │
//! │                        │  Transaction    │──►│   OrderLine     │       │
//! │                        │  paid, change   │   │  product_id     │       │
//! │                        └─────────────────┘   │  quantity       │       │
//! │                                              └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Wire names are camelCase; a customer's id travels as `userId`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::money::Money;

// =============================================================================
// Category
// =============================================================================

/// The fixed set of product categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
pub enum Category {
    Clothing,
    Accessories,
    Footwear,
    Beverages,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Category; 4] = [
        Category::Clothing,
        Category::Accessories,
        Category::Footwear,
        Category::Beverages,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Clothing => "Clothing",
            Category::Accessories => "Accessories",
            Category::Footwear => "Footwear",
            Category::Beverages => "Beverages",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ();

    /// Case-sensitive, matching the wire names exactly.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or(())
    }
}

// =============================================================================
// Product
// =============================================================================

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    pub name: String,

    pub sku: String,

    pub category: Category,

    /// Sellable units on hand. Never negative.
    pub stock: i64,

    /// Unit price in minor currency units.
    pub price: i64,

    pub image_url: String,

    pub notes: String,

    pub is_available: bool,

    /// Where the product sits in the store.
    pub location: String,

    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_minor(self.price)
    }

    /// Builds a product from validated fields.
    pub fn from_draft(id: String, draft: ProductDraft, created_at: DateTime<Utc>) -> Self {
        Product {
            id,
            name: draft.name,
            sku: draft.sku,
            category: draft.category,
            stock: draft.stock,
            price: draft.price,
            image_url: draft.image_url,
            notes: draft.notes,
            is_available: draft.is_available,
            location: draft.location,
            created_at,
        }
    }
}

/// Raw product fields as submitted by a client.
///
/// Everything is optional so that a missing field is reported as
/// "required" instead of a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub name: Option<String>,
    pub sku: Option<String>,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub notes: Option<String>,
    pub price: Option<i64>,
    pub stock: Option<i64>,
    pub location: Option<String>,
    pub is_available: Option<bool>,
}

/// Product fields that passed [`crate::validation::validate_product`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDraft {
    pub name: String,
    pub sku: String,
    pub category: Category,
    pub image_url: String,
    pub notes: String,
    pub price: i64,
    pub stock: i64,
    pub location: String,
    pub is_available: bool,
}

// =============================================================================
// Customer
// =============================================================================

/// A registered customer. Immutable after registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[serde(rename = "userId")]
    pub id: String,
    pub phone_number: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Staff
// =============================================================================

/// A staff member who can operate the till.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Staff {
    #[serde(rename = "userId")]
    pub id: String,
    pub phone_number: String,
    pub name: String,
    /// Argon2 PHC string. Never leaves the server.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Order Line & Transaction
// =============================================================================

/// One (product, quantity) pair of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    #[serde(default)]
    pub product_id: String,
    pub quantity: i64,
}

/// A checkout request after shape validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutOrder {
    pub customer_id: String,
    pub lines: Vec<OrderLine>,
    pub paid: Money,
    pub change: Money,
}

/// A committed sale. Created once per successful checkout, never modified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub transaction_id: String,
    pub customer_id: String,
    pub product_details: Vec<OrderLine>,
    pub paid: i64,
    pub change: i64,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse() {
        assert_eq!("Footwear".parse::<Category>(), Ok(Category::Footwear));
        assert!("footwear".parse::<Category>().is_err());
        assert!("Food".parse::<Category>().is_err());
    }

    #[test]
    fn test_customer_serializes_user_id() {
        let customer = Customer {
            id: "c-1".to_string(),
            phone_number: "+628123456789".to_string(),
            name: "Budi Santoso".to_string(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&customer).unwrap();
        assert_eq!(json["userId"], "c-1");
        assert_eq!(json["phoneNumber"], "+628123456789");
    }

    #[test]
    fn test_staff_hides_password_hash() {
        let staff = Staff {
            id: "s-1".to_string(),
            phone_number: "+628123456789".to_string(),
            name: "Siti Aminah".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&staff).unwrap();
        assert!(!json.contains("argon2"));
        assert!(!json.contains("passwordHash"));
    }

    #[test]
    fn test_order_line_wire_names() {
        let line: OrderLine =
            serde_json::from_str(r#"{"productId":"p-1","quantity":2}"#).unwrap();
        assert_eq!(line.product_id, "p-1");
        assert_eq!(line.quantity, 2);
    }
}
