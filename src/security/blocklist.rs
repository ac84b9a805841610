//! Scanner-path blocklist.
//!
//! Scanner traffic for well-known secret files and admin panels is answered
//! with a redirect to a decoy site instead of a 4xx, so the response never
//! confirms whether a path exists.

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::collections::HashSet;
use std::sync::Arc;

use crate::http::request::decoded_path;
use crate::observability::metrics;

/// Redirect target for blocked requests.
pub const DECOY_URL: &str = "https://prigoana.com";

const EXACT: &[&str] = &[
    ".env",
    "config.json",
    "config.yaml",
    "settings.php",
    "credentials.json",
    "secrets.json",
    "docker-compose.yml",
    "backup.zip",
    "database.sql",
    "info.php",
    "phpinfo.php",
    "debug.log",
    "admin",
    "administrator",
    "wp-login.php",
    "phpmyadmin",
    "install.php",
    "swagger-ui.html",
    "api-docs",
    "server-status",
];

const PREFIXES: &[&str] = &[
    ".",
    "docker-",
    "wp-",
    "wordpress/",
    "administrator/",
    "admin/",
    "phpmyadmin/",
    "actuator/",
    "api/",
    "v1/",
    "v2/",
    "backup/",
    "temp/",
    "tmp/",
];

/// Immutable set of denied paths, built once at startup.
#[derive(Debug, Clone)]
pub struct Blocklist {
    exact: HashSet<&'static str>,
    prefixes: &'static [&'static str],
}

impl Default for Blocklist {
    fn default() -> Self {
        Self {
            exact: EXACT.iter().copied().collect(),
            prefixes: PREFIXES,
        }
    }
}

impl Blocklist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `path` (as received, leading slash included) is denied.
    pub fn is_blocked(&self, path: &str) -> bool {
        // Traversal attempts are caught before trimming hides them.
        if path == "./" || path == "." || path.starts_with("/./") {
            return true;
        }

        let trimmed = path.trim_matches('/');
        self.exact.contains(trimmed) || self.prefixes.iter().any(|p| trimmed.starts_with(p))
    }
}

/// Decoy redirect returned for blocked paths.
pub fn decoy_redirect() -> Response {
    (StatusCode::FOUND, [(header::LOCATION, DECOY_URL)]).into_response()
}

/// Middleware redirecting blocklisted paths before they reach the handler.
pub async fn blocklist_middleware(
    State(blocklist): State<Arc<Blocklist>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let path = decoded_path(req.uri());
    if blocklist.is_blocked(&path) {
        tracing::warn!(method = %req.method(), path = %path, "Blocked scanner path");
        metrics::record_blocked();
        return decoy_redirect();
    }

    next.run(req).await
}
