//! API error mapping

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use dex_core::{PriceFeedError, StoreError};

/// Boundary error: an HTTP status plus a user-facing message, rendered as
/// `{"error": "..."}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<PriceFeedError> for ApiError {
    fn from(err: PriceFeedError) -> Self {
        let status = match &err {
            PriceFeedError::PriceUnavailable(_) => StatusCode::NOT_FOUND,
            PriceFeedError::ZeroPrice(_) => StatusCode::UNPROCESSABLE_ENTITY,
            PriceFeedError::InvalidAmount(_) => StatusCode::BAD_REQUEST,
        };
        Self::new(status, err.to_string())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        let status = match &err {
            StoreError::TokenNotFound(_) | StoreError::PoolNotFound(_) => StatusCode::NOT_FOUND,
            StoreError::DuplicateToken(_) => StatusCode::CONFLICT,
            StoreError::UnknownToken(_) | StoreError::Validation { .. } => StatusCode::BAD_REQUEST,
        };
        Self::new(status, err.to_string())
    }
}
