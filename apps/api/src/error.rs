//! Error types for the HTTP API.
//!
//! Every failure leaves the server as
//! `{"code": "NOT_FOUND", "message": "...", "statusCode": 404}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;
use tracing::error;

use till_core::error::ErrorKind;
use till_core::{CoreError, ValidationError};
use till_db::DbError;

/// Message shown for failures whose details stay in the logs.
const INTERNAL_MESSAGE: &str = "Internal server error";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    BadRequest,
    Unauthorized,
    NotFound,
    Conflict,
    Internal,
}

impl ErrorCode {
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorCode::BadRequest => StatusCode::BAD_REQUEST,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// API error returned by handlers and extractors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::BadRequest, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, message)
    }

    pub fn internal() -> Self {
        Self::new(ErrorCode::Internal, INTERNAL_MESSAGE)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.code.status();
        let body = json!({
            "code": self.code,
            "message": self.message,
            "statusCode": status.as_u16(),
        });
        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::bad_request(err.to_string())
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err.kind() {
            ErrorKind::BadRequest => ApiError::bad_request(err.to_string()),
            ErrorKind::NotFound => ApiError::not_found(err.to_string()),
            ErrorKind::Conflict => ApiError::conflict(err.to_string()),
            ErrorKind::Internal => {
                error!(error = %err, "Consistency failure");
                ApiError::internal()
            }
        }
    }
}

/// Storage errors.
///
/// ## Mapping
/// ```text
/// Domain(CoreError)                → by CoreError::kind
/// NotFound                         → 404
/// UniqueViolation on phone_number  → 409
/// everything else                  → 500, details logged
/// ```
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Domain(core) => core.into(),
            DbError::NotFound { entity, id } => {
                ApiError::not_found(format!("{entity} {id} is not found"))
            }
            DbError::UniqueViolation { field, value } if field.ends_with("phone_number") => {
                CoreError::PhoneNumberTaken(value).into()
            }
            other @ DbError::UniqueViolation { .. } => ApiError::conflict(other.to_string()),
            other => {
                error!(error = %other, "Storage failure");
                ApiError::internal()
            }
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_errors_map_by_kind() {
        let err: ApiError = CoreError::CustomerNotFound("c".into()).into();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "customerId is not found");

        let err: ApiError = CoreError::PaidNotEnough { paid: 1, total: 2 }.into();
        assert_eq!(err.code, ErrorCode::BadRequest);

        let err: ApiError = CoreError::StockNotFound("p".into()).into();
        assert_eq!(err, ApiError::internal());
    }

    #[test]
    fn test_db_errors_hide_details() {
        let err: ApiError = DbError::Busy("database is locked".into()).into();
        assert_eq!(err.code, ErrorCode::Internal);
        assert!(!err.message.contains("locked"));

        let err: ApiError = DbError::duplicate("staff.phone_number", "+62811").into();
        assert_eq!(err.code, ErrorCode::Conflict);
        assert!(err.message.contains("+62811"));

        let err: ApiError = DbError::not_found("Product", "p-1").into();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[test]
    fn test_code_serializes_screaming() {
        assert_eq!(
            serde_json::to_value(ErrorCode::BadRequest).unwrap(),
            "BAD_REQUEST"
        );
        assert_eq!(ErrorCode::Conflict.status(), StatusCode::CONFLICT);
    }
}
