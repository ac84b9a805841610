//! Request helpers.
//!
//! # Responsibilities
//! - Generate unique request ID (UUID v4)
//! - Decode the request path once for blocklist and key checks
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - An incoming `x-request-id` is kept, not replaced

use axum::http::{HeaderName, HeaderValue, Request, Uri};
use percent_encoding::percent_decode_str;
use std::borrow::Cow;
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

/// Header carrying the request ID.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Generates a UUID v4 per request.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeCounterRequestId;

impl MakeRequestId for MakeCounterRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Percent-decoded request path. Invalid UTF-8 is replaced, which later fails key validation.
pub fn decoded_path(uri: &Uri) -> Cow<'_, str> {
    percent_decode_str(uri.path()).decode_utf8_lossy()
}
