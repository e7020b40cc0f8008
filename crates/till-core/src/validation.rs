//! # Validation Module
//!
//! Per-field request rules for staff, customers and products.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Deserialization (serde)                                      │
//! │  ├── JSON shape and primitive types                                    │
//! │  └── Malformed body → 400                                              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Phone pattern, length bounds, enums, ranges, URL shape            │
//! │  └── Violation → ValidationError → 400                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── UNIQUE phone numbers                                              │
//! │  └── CHECK (stock >= 0), CHECK (price >= 1)                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Lengths are counted in characters, not bytes.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::ValidationError;
use crate::types::{Category, ProductDraft, ProductInput};
use crate::MAX_PRODUCT_STOCK;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// International phone number: leading `+`, country code, subscriber digits.
static PHONE_NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\+(?:[0-9]\d{0,2}|[1-9]\d{1,3}-?)\d{1,14}$").expect("valid phone regex")
});

// =============================================================================
// Shared Helpers
// =============================================================================

fn require<'a>(field: &str, value: Option<&'a str>) -> ValidationResult<&'a str> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ValidationError::required(field)),
    }
}

fn check_length(field: &str, value: &str, min: usize, max: usize) -> ValidationResult<()> {
    let len = value.chars().count();
    if len < min {
        return Err(ValidationError::TooShort {
            field: field.to_string(),
            min,
        });
    }
    if len > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }
    Ok(())
}

// =============================================================================
// People
// =============================================================================

/// Validates a phone number against the international pattern.
///
/// ## Example
/// ```rust
/// use till_core::validation::validate_phone_number;
///
/// assert!(validate_phone_number("+6281234567890").is_ok());
/// assert!(validate_phone_number("+62-8123456789").is_ok());
/// assert!(validate_phone_number("12345").is_err());
/// ```
pub fn validate_phone_number(phone: &str) -> ValidationResult<()> {
    if phone.is_empty() {
        return Err(ValidationError::required("phoneNumber"));
    }

    if !PHONE_NUMBER_RE.is_match(phone) {
        return Err(ValidationError::InvalidFormat {
            field: "phoneNumber".to_string(),
            reason: "must start with + and a country code".to_string(),
        });
    }

    Ok(())
}

/// Validates a person's display name: 5 to 50 characters.
pub fn validate_person_name(name: &str) -> ValidationResult<()> {
    if name.trim().is_empty() {
        return Err(ValidationError::required("name"));
    }
    check_length("name", name, 5, 50)
}

/// Validates a staff password: 5 to 15 characters.
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(ValidationError::required("password"));
    }
    check_length("password", password, 5, 15)
}

// =============================================================================
// Products
// =============================================================================

/// Validates an image URL: absolute, `http`/`https`, with a host.
///
/// ## Example
/// ```rust
/// use till_core::validation::validate_image_url;
///
/// assert!(validate_image_url("https://cdn.example.com/shoe.png").is_ok());
/// assert!(validate_image_url("http://").is_err());
/// assert!(validate_image_url("not a url").is_err());
/// ```
pub fn validate_image_url(raw: &str) -> ValidationResult<()> {
    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: "imageUrl".to_string(),
        reason: reason.to_string(),
    };

    let parsed = url::Url::parse(raw).map_err(|_| invalid("must be an absolute URL"))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https"));
    }

    match parsed.host_str() {
        Some(host) if !host.is_empty() => Ok(()),
        _ => Err(invalid("must include a host")),
    }
}

/// Validates every product field and returns the typed draft.
///
/// ## Rules
/// | field        | rule                                         |
/// |--------------|----------------------------------------------|
/// | name, sku    | non-empty, at most 30 characters             |
/// | category     | Clothing, Accessories, Footwear, Beverages   |
/// | imageUrl     | see [`validate_image_url`]                   |
/// | notes        | non-empty, at most 200 characters            |
/// | price        | at least 1                                   |
/// | stock        | 0 to 100000                                  |
/// | location     | non-empty, at most 200 characters            |
/// | isAvailable  | must be present                              |
///
/// The first failing field is reported.
pub fn validate_product(input: &ProductInput) -> ValidationResult<ProductDraft> {
    let name = require("name", input.name.as_deref())?;
    check_length("name", name, 1, 30)?;

    let sku = require("sku", input.sku.as_deref())?;
    check_length("sku", sku, 1, 30)?;

    let category_raw = require("category", input.category.as_deref())?;
    let category: Category = category_raw
        .parse()
        .map_err(|_| ValidationError::NotAllowed {
            field: "category".to_string(),
            allowed: Category::ALL.iter().map(|c| c.to_string()).collect(),
        })?;

    let image_url = require("imageUrl", input.image_url.as_deref())?;
    validate_image_url(image_url)?;

    let notes = require("notes", input.notes.as_deref())?;
    check_length("notes", notes, 1, 200)?;

    let price = input.price.ok_or_else(|| ValidationError::required("price"))?;
    if price < 1 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 1,
            max: i64::MAX,
        });
    }

    let stock = input.stock.ok_or_else(|| ValidationError::required("stock"))?;
    if !(0..=MAX_PRODUCT_STOCK).contains(&stock) {
        return Err(ValidationError::OutOfRange {
            field: "stock".to_string(),
            min: 0,
            max: MAX_PRODUCT_STOCK,
        });
    }

    let location = require("location", input.location.as_deref())?;
    check_length("location", location, 1, 200)?;

    let is_available = input
        .is_available
        .ok_or_else(|| ValidationError::required("isAvailable"))?;

    Ok(ProductDraft {
        name: name.to_string(),
        sku: sku.to_string(),
        category,
        image_url: image_url.to_string(),
        notes: notes.to_string(),
        price,
        stock,
        location: location.to_string(),
        is_available,
    })
}

// =============================================================================
// Identifiers
// =============================================================================

/// Validates a UUID string format.
///
/// ## Example
/// ```rust
/// use till_core::validation::validate_uuid;
///
/// assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("not-a-uuid").is_err());
/// ```
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::required("id"));
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
