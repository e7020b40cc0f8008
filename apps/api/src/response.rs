//! Success envelope: `{"message": "...", "data": ...}`.

use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// 200 with data.
pub fn ok<T: Serialize>(message: &str, data: T) -> Json<Envelope<T>> {
    Json(Envelope {
        message: message.to_string(),
        data: Some(data),
    })
}

/// 201 with data.
pub fn created<T: Serialize>(message: &str, data: T) -> (StatusCode, Json<Envelope<T>>) {
    (StatusCode::CREATED, ok(message, data))
}

/// 200 with only a message.
pub fn message(message: &str) -> Json<Envelope<()>> {
    Json(Envelope {
        message: message.to_string(),
        data: None,
    })
}
