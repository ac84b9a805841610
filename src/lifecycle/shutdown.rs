//! Shutdown coordination for the counter service.

use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

/// Coordinator for graceful shutdown.
///
/// Provides a broadcast channel that all long-running tasks can subscribe to.
pub struct Shutdown {
    /// Broadcast channel sender.
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    /// Create a new shutdown coordinator.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Trigger the shutdown signal.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Get the number of active subscribers (tasks still running).
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// How a drained task ended.
#[derive(Debug)]
pub enum DrainOutcome<T> {
    /// Finished within the window.
    Completed(T),
    /// Panicked or was cancelled.
    Failed(tokio::task::JoinError),
    /// Still running at the deadline; aborted.
    Aborted,
}

/// Wait up to `window` for `task` to finish, aborting it afterwards.
pub async fn drain<T>(mut task: JoinHandle<T>, window: Duration) -> DrainOutcome<T> {
    match tokio::time::timeout(window, &mut task).await {
        Ok(Ok(value)) => DrainOutcome::Completed(value),
        Ok(Err(e)) => DrainOutcome::Failed(e),
        Err(_) => {
            task.abort();
            DrainOutcome::Aborted
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_trigger_reaches_all_subscribers() {
        let shutdown = Shutdown::new();
        let mut a = shutdown.subscribe();
        let mut b = shutdown.subscribe();
        assert_eq!(shutdown.receiver_count(), 2);

        shutdown.trigger();
        assert!(a.recv().await.is_ok());
        assert!(b.recv().await.is_ok());
    }

    #[tokio::test]
    async fn test_drain_completes() {
        let task = tokio::spawn(async { 42 });
        assert!(matches!(drain(task, Duration::from_secs(1)).await, DrainOutcome::Completed(42)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_drain_aborts_stragglers() {
        let task = tokio::spawn(std::future::pending::<()>());
        assert!(matches!(drain(task, Duration::from_secs(5)).await, DrainOutcome::Aborted));
    }
}
