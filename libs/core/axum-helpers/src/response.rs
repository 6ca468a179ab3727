//! Uniform response envelope returned by every API operation.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use utoipa::ToSchema;

/// Standard response envelope.
///
/// Every operation, success or failure, answers with the same shape:
/// - `status`: the HTTP status code, repeated in the body
/// - `message`: `"success"` for successful operations, a descriptive
///   message otherwise
/// - `data`: the payload, or `null` when there is none
///
/// # JSON Example
///
/// ```json
/// {
///   "status": 200,
///   "message": "success",
///   "data": { "_id": "0192c7…", "title": "Jazz Night" }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    /// HTTP status code, repeated in the body for clients that do not
    /// inspect transport-level status
    pub status: u16,
    /// "success" or a descriptive error message
    pub message: String,
    /// Payload, serialized as `null` when absent
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Successful envelope with the given status code and payload.
    pub fn success(status: StatusCode, data: T) -> Self {
        Self {
            status: status.as_u16(),
            message: "success".to_string(),
            data: Some(data),
        }
    }

    /// 200 OK with payload.
    pub fn ok(data: T) -> Self {
        Self::success(StatusCode::OK, data)
    }

    /// 201 Created with payload.
    pub fn created(data: T) -> Self {
        Self::success(StatusCode::CREATED, data)
    }

    /// Successful envelope with no payload (`data: null`).
    pub fn ok_empty() -> Self {
        Self {
            status: StatusCode::OK.as_u16(),
            message: "success".to_string(),
            data: None,
        }
    }

    /// Error envelope with a descriptive message and `data: null`.
    pub fn error(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status: status.as_u16(),
            message: message.into(),
            data: None,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}
