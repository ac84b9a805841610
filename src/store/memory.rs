//! In-process counter store.
//!
//! Backs `--memory` mode and the test suites. Values do not survive a restart.

use async_trait::async_trait;
use dashmap::DashMap;

use crate::key::CounterKey;
use crate::store::{CounterStore, StoreError};

/// Counter map guarded per shard by `DashMap`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    counters: DashMap<String, i64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of `key`, if it was ever incremented.
    pub fn get(&self, key: &str) -> Option<i64> {
        self.counters.get(key).map(|v| *v)
    }

    pub fn len(&self) -> usize {
        self.counters.len()
    }
}

#[async_trait]
impl CounterStore for MemoryStore {
    async fn increment(&self, key: &CounterKey) -> Result<i64, StoreError> {
        // The entry guard holds the shard lock across read-modify-write.
        let mut entry = self.counters.entry(key.as_str().to_owned()).or_insert(0);
        let next = entry
            .checked_add(1)
            .ok_or_else(|| StoreError::unavailable("increment or decrement would overflow"))?;
        *entry = next;
        Ok(next)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_keys_are_independent() {
        let store = MemoryStore::new();
        let a = CounterKey::from_path("/a").unwrap();
        let b = CounterKey::from_path("/b").unwrap();

        assert_eq!(store.increment(&a).await.unwrap(), 1);
        assert_eq!(store.increment(&a).await.unwrap(), 2);
        assert_eq!(store.increment(&b).await.unwrap(), 1);
        assert_eq!(store.get("a"), Some(2));
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_overflow_is_a_store_failure() {
        let store = MemoryStore::new();
        store.counters.insert("max".into(), i64::MAX);
        let key = CounterKey::from_path("/max").unwrap();

        let err = store.increment(&key).await.unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
        assert_eq!(store.get("max"), Some(i64::MAX));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_increments_gap_free() {
        let store = Arc::new(MemoryStore::new());
        let key = CounterKey::from_path("/race").unwrap();
        let n = 200;

        let mut handles = Vec::with_capacity(n);
        for _ in 0..n {
            let store = store.clone();
            let key = key.clone();
            handles.push(tokio::spawn(async move { store.increment(&key).await.unwrap() }));
        }

        let mut seen = HashSet::new();
        for h in handles {
            assert!(seen.insert(h.await.unwrap()));
        }
        let expected: HashSet<i64> = (1..=n as i64).collect();
        assert_eq!(seen, expected);
    }
}
