use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use super::{page, param, QueryParams};
use crate::error::ApiResult;
use crate::extract::{AuthenticatedStaff, JsonBody};
use crate::response::{created, message, ok, Envelope};
use crate::services::product_service::CreatedProduct;
use crate::state::AppState;
use till_core::query::{parse_flag, ProductFilter, SortOrder};
use till_core::{Category, Product, ProductInput, DEFAULT_PRODUCT_LIMIT};

/// Builds the listing filter. Unknown categories, non-boolean flags and
/// unknown sort directions are dropped.
fn product_filter(params: &QueryParams) -> ProductFilter {
    ProductFilter {
        id: param(params, "id").map(str::to_string),
        name: param(params, "name").map(str::to_string),
        category: param(params, "category").and_then(|raw| raw.parse::<Category>().ok()),
        sku: param(params, "sku").map(str::to_string),
        is_available: param(params, "isAvailable").and_then(parse_flag),
        in_stock: param(params, "inStock").and_then(parse_flag),
        price_order: param(params, "price").and_then(SortOrder::parse),
        created_order: param(params, "createdAt")
            .and_then(SortOrder::parse)
            .unwrap_or_default(),
        page: page(params, DEFAULT_PRODUCT_LIMIT),
    }
}

/// `POST /v1/product`
pub async fn create(
    _staff: AuthenticatedStaff,
    State(state): State<AppState>,
    JsonBody(input): JsonBody<ProductInput>,
) -> ApiResult<(StatusCode, Json<Envelope<CreatedProduct>>)> {
    let product = state.products.create(input).await?;
    Ok(created("success", product))
}

/// `PUT /v1/product/{id}`
pub async fn update(
    _staff: AuthenticatedStaff,
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(input): JsonBody<ProductInput>,
) -> ApiResult<Json<Envelope<Product>>> {
    let product = state.products.update(id, input).await?;
    Ok(ok("success", product))
}

/// `DELETE /v1/product/{id}`
pub async fn delete(
    _staff: AuthenticatedStaff,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<()>>> {
    state.products.delete(id).await?;
    Ok(message("Product successfully deleted"))
}

/// `GET /v1/product`
pub async fn list(
    _staff: AuthenticatedStaff,
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> ApiResult<Json<Envelope<Vec<Product>>>> {
    let products = state.products.list(&product_filter(&params)).await?;
    Ok(ok("success", products))
}
