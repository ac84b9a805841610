//! HTTP hit counter keyed by request path, backed by Redis.

pub mod config;
pub mod http;
pub mod key;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod security;
pub mod store;

pub use config::CounterConfig;
pub use http::CounterServer;
pub use key::{CounterKey, KeyError};
pub use lifecycle::Shutdown;
pub use store::{CounterClient, CounterStore, MemoryStore, RedisStore, StoreError};
