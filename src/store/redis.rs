//! Redis-backed counter store.
//!
//! # Design Decisions
//! - One `ConnectionManager` per process; clones share the multiplexed link
//! - INCR is atomic server-side, so concurrent callers see gap-free values
//! - Client-side I/O timeouts map to the deadline class, everything else to unavailable

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, RedisError};

use crate::key::CounterKey;
use crate::store::{CounterStore, StoreError};

/// Counter store talking to Redis.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    /// Parse a connection URL without connecting.
    pub fn client(url: &str) -> Result<redis::Client, RedisError> {
        redis::Client::open(url)
    }

    /// Establish the shared connection.
    pub async fn connect(client: redis::Client) -> Result<Self, StoreError> {
        let conn = client.get_connection_manager().await.map_err(classify)?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl CounterStore for RedisStore {
    async fn increment(&self, key: &CounterKey) -> Result<i64, StoreError> {
        let mut conn = self.conn.clone();
        conn.incr(key.as_str(), 1i64).await.map_err(classify)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await.map_err(classify)?;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}

fn classify(err: RedisError) -> StoreError {
    if err.is_timeout() {
        StoreError::Deadline
    } else {
        StoreError::unavailable(err)
    }
}
