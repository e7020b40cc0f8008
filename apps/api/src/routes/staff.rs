use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::error::ApiResult;
use crate::extract::JsonBody;
use crate::response::{created, ok, Envelope};
use crate::services::staff_service::{LoginRequest, RegisterStaffRequest, StaffSession};
use crate::state::AppState;

/// `POST /v1/staff/register`
pub async fn register(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<RegisterStaffRequest>,
) -> ApiResult<(StatusCode, Json<Envelope<StaffSession>>)> {
    let session = state.staff.register(req).await?;
    Ok(created("User registered successfully", session))
}

/// `POST /v1/staff/login`
pub async fn login(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> ApiResult<Json<Envelope<StaffSession>>> {
    let session = state.staff.login(req).await?;
    Ok(ok("User logged successfully", session))
}
