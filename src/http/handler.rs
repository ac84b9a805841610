//! Counter request handler.
//!
//! Stateless per request:
//! ```text
//! method != GET      → 405
//! /                  → 200 "1" (landing, store untouched)
//! /favicon.ico       → 204
//! invalid key        → 400
//! store deadline     → 504
//! store unavailable  → 503
//! ok                 → 200 {"count": N}
//! ```

use axum::{
    extract::State,
    http::{header, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};

use crate::http::request::decoded_path;
use crate::http::response::{ApiError, CountBody};
use crate::http::server::AppState;
use crate::key::CounterKey;
use crate::observability::metrics;

const FAVICON_PATH: &str = "/favicon.ico";

/// Fallback handler serving every path.
pub async fn count_handler(State(state): State<AppState>, method: Method, uri: Uri) -> Response {
    let response = match handle(&state, &method, &uri).await {
        Ok(response) => response,
        Err(err) => {
            tracing::debug!(method = %method, path = %uri.path(), error = %err, "Request rejected");
            err.into_response()
        }
    };

    metrics::record_request(response.status());
    response
}

async fn handle(state: &AppState, method: &Method, uri: &Uri) -> Result<Response, ApiError> {
    if method != Method::GET {
        return Err(ApiError::MethodNotAllowed);
    }

    let path = decoded_path(uri);
    match path.as_ref() {
        "/" => return Ok(([(header::CONTENT_TYPE, "text/plain")], "1").into_response()),
        FAVICON_PATH => return Ok(StatusCode::NO_CONTENT.into_response()),
        _ => {}
    }

    let key = CounterKey::from_path(&path)?;
    let count = state.counter.increment(&key).await?;

    tracing::debug!(key = %key, count, "Counter incremented");
    Ok(Json(CountBody { count }).into_response())
}
