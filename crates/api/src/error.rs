//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::OrderError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// The submitted order failed validation.
    Validation(OrderError),
    /// Internal failure before the saga could be scheduled.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::Validation(err) => (StatusCode::UNPROCESSABLE_ENTITY, err.to_string()),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal error while accepting order");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error while accepting order.".to_string(),
                )
            }
        };

        let body = serde_json::json!({ "detail": detail });
        (status, axum::Json(body)).into_response()
    }
}

impl From<OrderError> for ApiError {
    fn from(err: OrderError) -> Self {
        ApiError::Validation(err)
    }
}
