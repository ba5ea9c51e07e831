//! API error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::services::stripe::StripeError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("No items submitted.")]
    MissingItems,

    #[error("Items payload is not valid JSON.")]
    InvalidJson,

    #[error("Your cart is empty.")]
    EmptyCart,

    #[error("Price for \"{name}\" must be valid (>= {min_cents} cents).")]
    InvalidPrice { name: String, min_cents: i64 },

    #[error("SITE_URL must be a full URL (e.g., http://localhost:4321 or https://your-domain.com)")]
    InvalidBaseUrl,

    #[error("Payment provider error: {0}")]
    Provider(String),

    #[error("Payment provider did not return a checkout URL")]
    MissingSessionUrl,

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    /// HTTP status and error type for this error
    pub fn status_and_type(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::MissingItems
            | ApiError::InvalidJson
            | ApiError::EmptyCart
            | ApiError::InvalidPrice { .. } => (StatusCode::BAD_REQUEST, "invalid_request_error"),
            ApiError::InvalidBaseUrl => (StatusCode::INTERNAL_SERVER_ERROR, "configuration_error"),
            ApiError::Provider(_) | ApiError::MissingSessionUrl => (StatusCode::BAD_GATEWAY, "api_error"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "api_error"),
        }
    }
}

impl From<StripeError> for ApiError {
    fn from(err: StripeError) -> Self {
        ApiError::Provider(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type) = self.status_and_type();

        let body = Json(ErrorResponse {
            type_: "error".to_string(),
            error: ErrorDetail {
                type_: error_type.to_string(),
                message: self.to_string(),
            },
        });

        (status, body).into_response()
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    #[serde(rename = "type")]
    type_: String,
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    #[serde(rename = "type")]
    type_: String,
    message: String,
}
