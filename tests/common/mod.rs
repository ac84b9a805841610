//! Shared utilities for integration tests.

use async_trait::async_trait;
use path_counter::config::CounterConfig;
use path_counter::lifecycle::{self, StartupError};
use path_counter::{CounterKey, CounterStore, MemoryStore, StoreError};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// A running service bound to an ephemeral local port.
pub struct TestServer {
    pub addr: SocketAddr,
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<Result<(), StartupError>>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Deliver the shutdown signal and wait for the full sequence to finish.
    pub async fn stop(self) -> Result<(), StartupError> {
        let _ = self.shutdown.send(());
        self.handle.await.expect("server task panicked")
    }
}

/// Start the service on 127.0.0.1 with the given store.
pub async fn start_server(store: Arc<dyn CounterStore>, config: CounterConfig) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel::<()>();

    let handle = tokio::spawn(lifecycle::serve(config, store, listener, async {
        let _ = rx.await;
    }));

    TestServer {
        addr,
        shutdown: tx,
        handle,
    }
}

#[allow(dead_code)]
pub async fn start_default() -> TestServer {
    start_server(Arc::new(MemoryStore::new()), CounterConfig::default()).await
}

/// HTTP client that reports redirects instead of following them.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .build()
        .unwrap()
}

/// Store whose every call fails like a refused connection.
#[allow(dead_code)]
pub struct FailingStore;

#[async_trait]
impl CounterStore for FailingStore {
    async fn increment(&self, _key: &CounterKey) -> Result<i64, StoreError> {
        Err(StoreError::unavailable("Connection refused (os error 111)"))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Err(StoreError::unavailable("Connection refused (os error 111)"))
    }

    fn backend(&self) -> &'static str {
        "failing"
    }
}

/// Memory store that sleeps before every increment and counts calls.
#[allow(dead_code)]
pub struct SlowStore {
    inner: MemoryStore,
    delay: Duration,
    pub calls: AtomicUsize,
}

#[allow(dead_code)]
impl SlowStore {
    pub fn new(delay: Duration) -> Self {
        Self {
            inner: MemoryStore::new(),
            delay,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CounterStore for SlowStore {
    async fn increment(&self, key: &CounterKey) -> Result<i64, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.inner.increment(key).await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "slow"
    }
}
