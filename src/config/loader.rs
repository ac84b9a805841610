//! Configuration loading from the command line and environment.

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

use crate::config::schema::{CounterConfig, LogFormat, ObservabilityConfig, StoreBackend};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("REDIS_URL not set")]
    MissingStoreUrl,
    #[error("invalid cors origin `{0}`")]
    InvalidOrigin(String),
    #[error("validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load a `.env` file from the working directory or its parents.
///
/// Variables already present in the environment win. A missing file is not
/// an error.
pub fn load_env_file() -> Result<Option<PathBuf>, dotenvy::Error> {
    match dotenvy::dotenv() {
        Ok(path) => Ok(Some(path)),
        Err(err) if err.not_found() => Ok(None),
        Err(err) => Err(err),
    }
}

/// Command line arguments, each with an environment fallback.
#[derive(Debug, Clone, Parser)]
#[command(name = "path-counter")]
#[command(about = "HTTP hit counter keyed by request path, backed by Redis", long_about = None)]
pub struct CounterArgs {
    /// Redis connection URL.
    #[arg(long, env = "REDIS_URL")]
    pub redis_url: Option<String>,

    /// Port to listen on.
    #[arg(short, long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// Value of Access-Control-Allow-Origin.
    #[arg(long, env = "CORS_ALLOWED_ORIGIN", default_value = "*")]
    pub cors_origin: String,

    /// Log output format.
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    /// Address for the Prometheus scrape endpoint.
    #[arg(long, env = "METRICS_ADDR")]
    pub metrics_addr: Option<SocketAddr>,

    /// Keep counters in process memory instead of Redis.
    #[arg(long)]
    pub memory: bool,
}

impl CounterArgs {
    /// Resolve into a validated config.
    pub fn into_config(self) -> Result<CounterConfig, ConfigError> {
        let store = if self.memory {
            StoreBackend::Memory
        } else {
            match self.redis_url.filter(|url| !url.trim().is_empty()) {
                Some(url) => StoreBackend::Redis { url },
                None => return Err(ConfigError::MissingStoreUrl),
            }
        };

        let config = CounterConfig {
            store,
            port: self.port,
            cors_origin: self.cors_origin,
            observability: ObservabilityConfig {
                log_format: self.log_format,
                metrics_address: self.metrics_addr,
            },
            ..CounterConfig::default()
        };

        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}
