//! Startup orchestration.
//!
//! # Responsibilities
//! - Open the counter store and verify it answers
//! - Install the optional metrics exporter
//! - Bind the listener last, so traffic arrives only when ready
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Connect and ping share one deadline

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::{ConfigError, CounterConfig, StoreBackend};
use crate::observability::metrics;
use crate::resilience::timeouts::with_deadline;
use crate::store::{CounterStore, MemoryStore, RedisStore, StoreError};

/// Fatal startup and serving failures.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("invalid redis url: {0}")]
    InvalidStoreUrl(#[source] redis::RedisError),
    #[error("cannot reach {backend} store: {source}")]
    Unreachable {
        backend: &'static str,
        #[source]
        source: StoreError,
    },
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },
    #[error("failed to start metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),
    #[error("server error: {0}")]
    Server(#[source] io::Error),
}

/// Open the configured store and ping it before any traffic is accepted.
pub async fn connect_store(config: &CounterConfig) -> Result<Arc<dyn CounterStore>, StartupError> {
    let deadline = config.timeouts.connect;

    let (backend, connected) = match &config.store {
        StoreBackend::Memory => {
            let store: Arc<dyn CounterStore> = Arc::new(MemoryStore::new());
            ("memory", with_deadline(deadline, ping(store)).await)
        }
        StoreBackend::Redis { url } => {
            let client = RedisStore::client(url).map_err(StartupError::InvalidStoreUrl)?;
            let connected = with_deadline(deadline, async {
                let store: Arc<dyn CounterStore> = Arc::new(RedisStore::connect(client).await?);
                ping(store).await
            })
            .await;
            ("redis", connected)
        }
    };

    let store = connected.map_err(|source| StartupError::Unreachable { backend, source })?;
    tracing::info!(
        backend,
        store = %config.store.describe(),
        "Store connection verified"
    );
    Ok(store)
}

async fn ping(store: Arc<dyn CounterStore>) -> Result<Arc<dyn CounterStore>, StoreError> {
    store.ping().await?;
    Ok(store)
}

/// Install the metrics exporter when an address is configured.
pub fn init_observability(config: &CounterConfig) -> Result<(), StartupError> {
    if let Some(addr) = config.observability.metrics_address {
        metrics::init_metrics(addr)?;
    }
    Ok(())
}

/// Bind the public listener.
pub async fn bind(config: &CounterConfig) -> Result<TcpListener, StartupError> {
    let addr = config.bind_address();
    TcpListener::bind(addr)
        .await
        .map_err(|source| StartupError::Bind { addr, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_memory_store_connects() {
        let store = connect_store(&CounterConfig::default()).await.unwrap();
        assert_eq!(store.backend(), "memory");
    }

    #[tokio::test]
    async fn test_unreachable_redis_is_fatal() {
        // Nothing listens on port 1.
        let mut config = CounterConfig {
            store: StoreBackend::Redis {
                url: "redis://127.0.0.1:1".into(),
            },
            ..CounterConfig::default()
        };
        config.timeouts.connect = Duration::from_secs(2);

        let err = connect_store(&config).await.err().unwrap();
        assert!(matches!(err, StartupError::Unreachable { backend: "redis", .. }));
    }

    #[tokio::test]
    async fn test_malformed_url_is_fatal() {
        let config = CounterConfig {
            store: StoreBackend::Redis {
                url: "definitely not redis".into(),
            },
            ..CounterConfig::default()
        };

        let err = connect_store(&config).await.err().unwrap();
        assert!(matches!(err, StartupError::InvalidStoreUrl(_)));
    }
}
