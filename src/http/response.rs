//! Response bodies and error mapping.
//!
//! # Responsibilities
//! - Define the JSON success body and the uniform error envelope
//! - Map key and store errors to HTTP status codes
//!
//! # Design Decisions
//! - Client errors carry their own message, upstream errors a fixed one
//! - Store timeouts result in 504 Gateway Timeout

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::key::KeyError;
use crate::store::StoreError;

/// `{"count": N}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountBody {
    pub count: i64,
}

/// `{"error": "..."}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Errors surfaced to HTTP clients.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Method not allowed")]
    MethodNotAllowed,
    #[error(transparent)]
    InvalidKey(#[from] KeyError),
    #[error("Request timed out")]
    Timeout,
    #[error("Service is temporarily unavailable")]
    Unavailable,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::InvalidKey(_) => StatusCode::BAD_REQUEST,
            ApiError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Deadline => ApiError::Timeout,
            // Details were logged by the store client.
            StoreError::Unavailable(_) => ApiError::Unavailable,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
