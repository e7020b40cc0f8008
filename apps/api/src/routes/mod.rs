//! HTTP routes.
//!
//! ## Route Table
//! ```text
//! ┌──────────────────────────────┬──────────┬───────────────────────────┐
//! │ Path (under /v1)             │ Method   │ Auth                      │
//! ├──────────────────────────────┼──────────┼───────────────────────────┤
//! │ /health                      │ GET      │ -                         │
//! │ /staff/register              │ POST     │ -                         │
//! │ /staff/login                 │ POST     │ -                         │
//! │ /customer/register           │ POST     │ bearer                    │
//! │ /customer                    │ GET      │ bearer                    │
//! │ /product                     │ POST GET │ bearer                    │
//! │ /product/{id}                │ PUT DEL  │ bearer                    │
//! │ /product/checkout            │ POST     │ bearer                    │
//! │ /transaction                 │ GET      │ bearer                    │
//! └──────────────────────────────┴──────────┴───────────────────────────┘
//! ```
//!
//! Protected handlers take [`crate::extract::AuthenticatedStaff`]; a request
//! without a valid token never reaches the handler body.

use std::collections::HashMap;

use axum::routing::{get, post, put};
use axum::Router;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::error::ApiError;
use crate::state::AppState;
use till_core::query::Page;

mod checkout;
mod customer;
mod health;
mod product;
mod staff;
mod transaction;

/// Builds the full router with tracing and a per-request timeout.
pub fn router(state: AppState) -> Router {
    let timeout = state.config.request_timeout();

    let v1 = Router::new()
        .route("/health", get(health::health))
        .route("/staff/register", post(staff::register))
        .route("/staff/login", post(staff::login))
        .route("/customer/register", post(customer::register))
        .route("/customer", get(customer::list))
        .route("/product", post(product::create).get(product::list))
        .route("/product/checkout", post(checkout::checkout))
        .route("/product/{id}", put(product::update).delete(product::delete))
        .route("/transaction", get(transaction::list));

    Router::new()
        .nest("/v1", v1)
        .fallback(not_found)
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn not_found() -> ApiError {
    ApiError::not_found("Route not found")
}

// =============================================================================
// Query Parameters
// =============================================================================

/// Raw query string pairs. Values that do not parse are ignored rather than
/// rejected.
pub(crate) type QueryParams = HashMap<String, String>;

/// A non-empty parameter value.
pub(crate) fn param<'a>(params: &'a QueryParams, key: &str) -> Option<&'a str> {
    params
        .get(key)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
}

pub(crate) fn page(params: &QueryParams, default_limit: i64) -> Page {
    let number = |key| param(params, key).and_then(|raw| raw.parse::<i64>().ok());
    Page::new(number("limit"), number("offset"), default_limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> QueryParams {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_page_ignores_garbage() {
        let p = page(&params(&[("limit", "abc"), ("offset", "3")]), 5);
        assert_eq!(p, Page { limit: 5, offset: 3 });

        let p = page(&params(&[("limit", "-2"), ("offset", "-1")]), 10);
        assert_eq!(p, Page { limit: 10, offset: 0 });
    }

    #[test]
    fn test_blank_param_is_absent() {
        let q = params(&[("name", "  ")]);
        assert_eq!(param(&q, "name"), None);
        assert_eq!(param(&q, "missing"), None);
    }
}
