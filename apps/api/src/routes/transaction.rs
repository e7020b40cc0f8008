use axum::extract::{Query, State};
use axum::Json;

use super::{page, param, QueryParams};
use crate::error::ApiResult;
use crate::extract::AuthenticatedStaff;
use crate::response::{ok, Envelope};
use crate::state::AppState;
use till_core::query::{SortOrder, TransactionFilter};
use till_core::{Transaction, DEFAULT_TRANSACTION_LIMIT};

fn transaction_filter(params: &QueryParams) -> TransactionFilter {
    TransactionFilter {
        customer_id: param(params, "customerId").map(str::to_string),
        created_order: param(params, "createdAt")
            .and_then(SortOrder::parse)
            .unwrap_or_default(),
        page: page(params, DEFAULT_TRANSACTION_LIMIT),
    }
}

/// `GET /v1/transaction`
pub async fn list(
    _staff: AuthenticatedStaff,
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> ApiResult<Json<Envelope<Vec<Transaction>>>> {
    let transactions = state.checkout.history(&transaction_filter(&params)).await?;
    Ok(ok("success", transactions))
}
