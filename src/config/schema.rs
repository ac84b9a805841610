//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! Values come from the command line or environment (see `loader.rs`).

use clap::ValueEnum;
use serde::Serialize;
use std::net::SocketAddr;
use std::time::Duration;
use url::Url;

/// Root configuration for the counter service.
#[derive(Debug, Clone, Serialize)]
pub struct CounterConfig {
    /// Where counters live.
    pub store: StoreBackend,

    /// TCP port to listen on (all interfaces).
    pub port: u16,

    /// `Access-Control-Allow-Origin` value.
    pub cors_origin: String,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            store: StoreBackend::Memory,
            port: 5000,
            cors_origin: "*".to_string(),
            timeouts: TimeoutConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl CounterConfig {
    pub fn bind_address(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

/// Counter store selection.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StoreBackend {
    Redis {
        #[serde(serialize_with = "serialize_redacted")]
        url: String,
    },
    Memory,
}

impl StoreBackend {
    /// Loggable description with any password masked.
    pub fn describe(&self) -> String {
        match self {
            StoreBackend::Redis { url } => redact(url),
            StoreBackend::Memory => "memory".to_string(),
        }
    }
}

fn redact(url: &str) -> String {
    match Url::parse(url) {
        Ok(mut parsed) => {
            if parsed.password().is_some() {
                let _ = parsed.set_password(Some("***"));
            }
            parsed.to_string()
        }
        Err(_) => "<unparseable>".to_string(),
    }
}

fn serialize_redacted<S: serde::Serializer>(url: &str, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&redact(url))
}

/// Timeout configuration.
#[derive(Debug, Clone, Serialize)]
pub struct TimeoutConfig {
    /// Deadline for one store increment.
    pub store_op: Duration,

    /// Deadline for connecting to and pinging the store at startup.
    pub connect: Duration,

    /// Drain window for in-flight requests after a shutdown signal.
    pub shutdown: Duration,

    /// Ceiling for a whole request, middleware included.
    pub request: Duration,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            store_op: Duration::from_secs(3),
            connect: Duration::from_secs(5),
            shutdown: Duration::from_secs(5),
            request: Duration::from_secs(10),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability settings.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ObservabilityConfig {
    pub log_format: LogFormat,

    /// Prometheus scrape listener; disabled when unset.
    pub metrics_address: Option<SocketAddr>,
}
