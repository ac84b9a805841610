//! Counter store subsystem.
//!
//! # Data Flow
//! ```text
//! Handler
//!     → CounterClient (deadline, classification, metrics)
//!     → dyn CounterStore
//!         → redis.rs  (INCR against the shared Redis instance)
//!         → memory.rs (in-process map, dev mode and tests)
//! ```
//!
//! # Design Decisions
//! - Atomicity is the store's job; no locks are held here
//! - One attempt per request, no retries
//! - Store internals never reach the client; they are logged instead

pub mod memory;
pub mod redis;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::key::CounterKey;
use crate::observability::metrics;
use crate::resilience::timeouts::with_deadline;

pub use self::memory::MemoryStore;
pub use self::redis::RedisStore;

/// Boxed error carried by [`StoreError::Unavailable`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failure classification for store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The operation did not finish before its deadline.
    #[error("store operation exceeded its deadline")]
    Deadline,
    /// Any other store-level failure.
    #[error("store unavailable: {0}")]
    Unavailable(#[source] BoxError),
}

impl StoreError {
    pub fn unavailable(err: impl Into<BoxError>) -> Self {
        StoreError::Unavailable(err.into())
    }
}

/// Storage backend holding the counters.
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Atomically add one to `key` and return the new value.
    async fn increment(&self, key: &CounterKey) -> Result<i64, StoreError>;

    /// Round-trip check used before accepting traffic.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Backend name for logs.
    fn backend(&self) -> &'static str;
}

/// Handle used by the HTTP layer.
///
/// Wraps the shared store with the per-request deadline.
#[derive(Clone)]
pub struct CounterClient {
    store: Arc<dyn CounterStore>,
    deadline: Duration,
}

impl CounterClient {
    pub fn new(store: Arc<dyn CounterStore>, deadline: Duration) -> Self {
        Self { store, deadline }
    }

    /// Increment `key` once, bounded by the configured deadline.
    pub async fn increment(&self, key: &CounterKey) -> Result<i64, StoreError> {
        let start = Instant::now();
        let result = with_deadline(self.deadline, self.store.increment(key)).await;
        metrics::record_store_latency(start);

        match &result {
            Ok(_) => {}
            Err(StoreError::Deadline) => {
                tracing::warn!(
                    key = %key,
                    backend = self.store.backend(),
                    deadline_ms = self.deadline.as_millis() as u64,
                    "Store increment timed out"
                );
            }
            Err(StoreError::Unavailable(e)) => {
                tracing::error!(
                    key = %key,
                    backend = self.store.backend(),
                    error = %e,
                    "Store increment failed"
                );
            }
        }

        result
    }
}
