//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (clap handles syntactic)
//! - Store URL must parse and use a Redis scheme
//! - Port must be non-zero, origin must be a valid header value
//! - Timeouts must be positive
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: CounterConfig → Result<(), Vec<ValidationError>>

use axum::http::HeaderValue;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::config::schema::{CounterConfig, StoreBackend};

const REDIS_SCHEMES: &[&str] = &["redis", "rediss", "redis+unix", "unix"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("store url is not a valid URL: {0}")]
    UnparseableUrl(String),
    #[error("store url scheme `{0}` is not supported")]
    UnsupportedScheme(String),
    #[error("port must be non-zero")]
    ZeroPort,
    #[error("cors origin `{0}` is not a valid header value")]
    InvalidOrigin(String),
    #[error("timeout `{0}` must be greater than zero")]
    ZeroTimeout(&'static str),
}

pub fn validate_config(config: &CounterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let StoreBackend::Redis { url } = &config.store {
        match Url::parse(url) {
            Ok(parsed) if !REDIS_SCHEMES.contains(&parsed.scheme()) => {
                errors.push(ValidationError::UnsupportedScheme(parsed.scheme().to_string()));
            }
            Ok(_) => {}
            Err(e) => errors.push(ValidationError::UnparseableUrl(e.to_string())),
        }
    }

    if config.port == 0 {
        errors.push(ValidationError::ZeroPort);
    }

    if HeaderValue::from_str(&config.cors_origin).is_err() {
        errors.push(ValidationError::InvalidOrigin(config.cors_origin.clone()));
    }

    let timeouts = [
        ("store_op", config.timeouts.store_op),
        ("connect", config.timeouts.connect),
        ("shutdown", config.timeouts.shutdown),
        ("request", config.timeouts.request),
    ];
    for (name, value) in timeouts {
        if value == Duration::ZERO {
            errors.push(ValidationError::ZeroTimeout(name));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
