use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;

use super::{page, param, QueryParams};
use crate::error::ApiResult;
use crate::extract::{AuthenticatedStaff, JsonBody};
use crate::response::{created, ok, Envelope};
use crate::services::customer_service::RegisterCustomerRequest;
use crate::state::AppState;
use till_core::query::CustomerFilter;
use till_core::{Customer, DEFAULT_CUSTOMER_LIMIT};

fn customer_filter(params: &QueryParams) -> CustomerFilter {
    CustomerFilter {
        name: param(params, "name").map(str::to_string),
        phone_number: param(params, "phoneNumber").map(str::to_string),
        page: page(params, DEFAULT_CUSTOMER_LIMIT),
    }
}

/// `POST /v1/customer/register`
pub async fn register(
    _staff: AuthenticatedStaff,
    State(state): State<AppState>,
    JsonBody(req): JsonBody<RegisterCustomerRequest>,
) -> ApiResult<(StatusCode, Json<Envelope<Customer>>)> {
    let customer = state.customers.register(req).await?;
    Ok(created("Customer registered successfully", customer))
}

/// `GET /v1/customer`
pub async fn list(
    _staff: AuthenticatedStaff,
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> ApiResult<Json<Envelope<Vec<Customer>>>> {
    let customers = state.customers.list(&customer_filter(&params)).await?;
    Ok(ok("success", customers))
}
