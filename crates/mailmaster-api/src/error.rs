//! JSON error responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use mailmaster_common::Error;
use serde_json::json;
use tracing::error;

/// Message sent for any server-side failure
pub const SERVER_ERROR: &str = "Server Error";

/// Message sent when a policy denies an action
pub const FORBIDDEN: &str = "This action is unauthorized.";

/// Handler error wrapping [`mailmaster_common::Error`]
#[derive(Debug)]
pub struct ApiError(pub Error);

pub type ApiResult<T> = Result<T, ApiError>;

impl<E: Into<Error>> From<E> for ApiError {
    fn from(e: E) -> Self {
        ApiError(e.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let body = match &self.0 {
            Error::Validation(errors) => json!({
                "message": self.0.to_string(),
                "errors": errors,
            }),
            Error::Auth(message) | Error::InvalidState(message) | Error::BadRequest(message) => {
                json!({ "message": message })
            }
            Error::PermissionDenied(_) => json!({ "message": FORBIDDEN }),
            Error::NotFound(_) => json!({ "message": "Resource not found." }),
            e => {
                error!(code = e.code(), "Request failed: {}", e);
                json!({ "message": SERVER_ERROR })
            }
        };

        (status, Json(body)).into_response()
    }
}
