//! # Error Types
//!
//! Domain-specific error types for till-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  till-core errors (this file)                                          │
//! │  ├── CoreError        - Business rule failures                         │
//! │  └── ValidationError  - Request field failures                         │
//! │                                                                         │
//! │  till-db errors                                                        │
//! │  └── DbError          - Storage failures (+ Domain(CoreError))         │
//! │                                                                         │
//! │  till-api errors                                                       │
//! │  └── ApiError         - {code, message, statusCode} JSON payload       │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Client       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule failures.
///
/// Each variant maps onto exactly one HTTP status in till-api, see
/// [`CoreError::kind`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Customer id does not resolve (or is not a valid id at all).
    #[error("customerId is not found")]
    CustomerNotFound(String),

    /// Product id does not resolve (or is not a valid id at all).
    #[error("productId {0} is not found")]
    ProductNotFound(String),

    /// An order line was submitted without a product id.
    #[error("productId is required")]
    ProductIdRequired,

    /// An order needs at least one line.
    #[error("productDetails must contain at least one item")]
    EmptyOrder,

    /// Requested quantity exceeds current stock.
    ///
    /// ## User Workflow
    /// ```text
    /// Checkout (qty: 6)
    ///      │
    ///      ▼
    /// Check stock: available=5
    ///      │
    ///      ▼
    /// InsufficientStock { product_id, available: 5, requested: 6 }
    ///      │
    ///      ▼
    /// 400 "quantity for product ... is not enough"
    /// ```
    #[error("quantity for product {product_id} is not enough: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: String,
        available: i64,
        requested: i64,
    },

    /// Product exists but is marked unavailable.
    #[error("product {0} is not available")]
    ProductUnavailable(String),

    /// Paid amount is below the order total.
    #[error("Paid amount is not enough based on all bought products: paid {paid}, total {total}")]
    PaidNotEnough { paid: i64, total: i64 },

    /// Change does not equal `paid - total`.
    #[error("Change is not correct based on all bought products and what is paid: expected {expected}, given {given}")]
    IncorrectChange { expected: i64, given: i64 },

    /// Pricing arithmetic left the i64 range.
    #[error("order total is too large")]
    AmountOverflow,

    /// Phone number is already registered (customer or staff).
    #[error("phoneNumber {0} already exists")]
    PhoneNumberTaken(String),

    /// Unknown staff phone number or wrong password.
    #[error("Invalid phone number or password")]
    InvalidCredentials,

    /// A product resolved during validation is missing from the stock read.
    ///
    /// Only reachable if storage changed underneath an open checkout.
    #[error("stock for product {0} could not be read")]
    StockNotFound(String),

    /// Validation error (wraps ValidationError).
    #[error("{0}")]
    Validation(#[from] ValidationError),
}

/// Coarse failure classes, one per HTTP status the API emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    BadRequest,
    NotFound,
    Conflict,
    Internal,
}

impl CoreError {
    /// Classifies the error for transport mapping.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::CustomerNotFound(_) | CoreError::ProductNotFound(_) => ErrorKind::NotFound,
            CoreError::PhoneNumberTaken(_) => ErrorKind::Conflict,
            CoreError::StockNotFound(_) => ErrorKind::Internal,
            CoreError::ProductIdRequired
            | CoreError::EmptyOrder
            | CoreError::InsufficientStock { .. }
            | CoreError::ProductUnavailable(_)
            | CoreError::PaidNotEnough { .. }
            | CoreError::IncorrectChange { .. }
            | CoreError::AmountOverflow
            | CoreError::InvalidCredentials
            | CoreError::Validation(_) => ErrorKind::BadRequest,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Request field validation errors.
///
/// Raised before any business logic runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g., invalid phone number, malformed URL).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

impl ValidationError {
    pub(crate) fn required(field: &str) -> Self {
        ValidationError::Required {
            field: field.to_string(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            product_id: "p-1".to_string(),
            available: 5,
            requested: 6,
        };
        assert_eq!(
            err.to_string(),
            "quantity for product p-1 is not enough: available 5, requested 6"
        );

        let err = CoreError::PaidNotEnough {
            paid: 4000,
            total: 5000,
        };
        assert!(err.to_string().starts_with("Paid amount is not enough"));
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::required("sku");
        assert_eq!(err.to_string(), "sku is required");

        let err = ValidationError::TooShort {
            field: "name".to_string(),
            min: 5,
        };
        assert_eq!(err.to_string(), "name must be at least 5 characters");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let core_err: CoreError = ValidationError::required("sku").into();
        assert!(matches!(core_err, CoreError::Validation(_)));
        assert_eq!(core_err.kind(), ErrorKind::BadRequest);
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            CoreError::CustomerNotFound("x".into()).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            CoreError::PhoneNumberTaken("+62811".into()).kind(),
            ErrorKind::Conflict
        );
        assert_eq!(
            CoreError::StockNotFound("p".into()).kind(),
            ErrorKind::Internal
        );
        assert_eq!(CoreError::InvalidCredentials.kind(), ErrorKind::BadRequest);
    }
}
