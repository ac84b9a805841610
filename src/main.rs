//! path-counter
//!
//! HTTP hit counter: every GET to a path atomically increments the Redis
//! counter named after that path and returns the new value.
//!
//! # Architecture Overview
//!
//! ```text
//!   Client ──▶ cors ──▶ blocklist ──▶ handler ──▶ key ──▶ store ──▶ Redis
//!                │           │            │                  │
//!            OPTIONS 204   302 decoy   405/400/200       504/503
//!
//!   lifecycle: config → connect + ping → bind → serve → signal → drain → release
//! ```

use clap::Parser;

use path_counter::config::{self, CounterArgs, CounterConfig};
use path_counter::lifecycle::{self, signals, startup, StartupError};
use path_counter::observability::logging;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env_file = config::load_env_file();
    let args = CounterArgs::parse();
    logging::init(args.log_format);

    tracing::info!("path-counter v{} starting", env!("CARGO_PKG_VERSION"));
    match env_file {
        Ok(Some(path)) => tracing::info!(path = %path.display(), "Loaded environment file"),
        Ok(None) => {}
        Err(e) => tracing::warn!(error = %e, "Ignoring unreadable environment file"),
    }

    let config = args.into_config().inspect_err(|e| {
        tracing::error!(error = %e, "Invalid configuration");
    })?;

    tracing::info!(
        store = %config.store.describe(),
        port = config.port,
        cors_origin = %config.cors_origin,
        store_timeout_ms = config.timeouts.store_op.as_millis() as u64,
        "Configuration loaded"
    );

    run(config).await.inspect_err(|e| {
        tracing::error!(error = %e, "Fatal error");
    })?;

    tracing::info!("Shutdown complete");
    Ok(())
}

async fn run(config: CounterConfig) -> Result<(), StartupError> {
    startup::init_observability(&config)?;
    let store = startup::connect_store(&config).await?;
    let listener = startup::bind(&config).await?;
    lifecycle::serve(config, store, listener, signals::wait_for_termination()).await
}
