use axum::extract::State;
use axum::Json;

use crate::error::ApiResult;
use crate::extract::{AuthenticatedStaff, JsonBody};
use crate::response::{ok, Envelope};
use crate::services::checkout_service::CheckoutRequest;
use crate::state::AppState;
use till_core::Transaction;

/// `POST /v1/product/checkout`
pub async fn checkout(
    AuthenticatedStaff(claims): AuthenticatedStaff,
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CheckoutRequest>,
) -> ApiResult<Json<Envelope<Transaction>>> {
    tracing::debug!(staff_id = %claims.sub, "Checkout requested");
    let transaction = state.checkout.checkout(req).await?;
    Ok(ok("Successfully Checkout", transaction))
}
