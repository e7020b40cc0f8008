//! Request extractors.
//!
//! - [`AuthenticatedStaff`] - bearer token → claims, or 401
//! - [`JsonBody`] - `Json<T>` whose rejections use the API error shape

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::Json;
use tracing::warn;

use crate::auth::{extract_bearer_token, Claims};
use crate::error::ApiError;
use crate::state::AppState;

/// The staff member behind a valid bearer token.
///
/// ## Usage
/// ```rust,ignore
/// async fn handler(AuthenticatedStaff(claims): AuthenticatedStaff) { ... }
/// ```
#[derive(Debug, Clone)]
pub struct AuthenticatedStaff(pub Claims);

impl FromRequestParts<AppState> for AuthenticatedStaff {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(extract_bearer_token)
            .ok_or_else(|| ApiError::unauthorized("Unauthorized"))?;

        let claims = state.jwt.validate(token).inspect_err(|err| {
            warn!(path = %parts.uri.path(), reason = %err, "Rejected bearer token");
        })?;

        Ok(AuthenticatedStaff(claims))
    }
}

/// JSON body; malformed or mistyped bodies become 400 `BAD_REQUEST`.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(ApiError::bad_request(rejection.body_text())),
        }
    }
}
