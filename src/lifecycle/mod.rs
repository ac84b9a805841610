//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Connect store → Ping (5s) → Bind listener
//!
//! Serve (this module):
//!     Spawn server task → wait for signal or server exit
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop accepting → Drain (5s) → Abort stragglers → Release store
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then store, then listener
//! - Ordered shutdown: stop accept, drain, close store
//! - Shutdown has timeout: forced close after deadline

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::{drain, DrainOutcome, Shutdown};
pub use startup::StartupError;

use std::future::Future;
use std::io;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::config::CounterConfig;
use crate::http::CounterServer;
use crate::store::CounterStore;

/// Serve on `listener` until `signal` resolves, then run the shutdown sequence.
///
/// Returns early with an error if the server stops on its own.
pub async fn serve<F>(
    config: CounterConfig,
    store: Arc<dyn CounterStore>,
    listener: TcpListener,
    signal: F,
) -> Result<(), StartupError>
where
    F: Future<Output = ()>,
{
    let drain_window = config.timeouts.shutdown;
    let server = CounterServer::new(config, store.clone())?;
    let shutdown = Shutdown::new();
    let mut server_task = tokio::spawn(server.run(listener, shutdown.subscribe()));

    tokio::select! {
        _ = signal => {}
        result = &mut server_task => {
            release_store(store);
            return match result {
                Ok(Ok(())) => Ok(()),
                Ok(Err(e)) => Err(StartupError::Server(e)),
                Err(e) => Err(StartupError::Server(io::Error::other(e))),
            };
        }
    }

    tracing::info!(
        drain_secs = drain_window.as_secs_f64(),
        "Stopping listener and draining in-flight requests"
    );
    shutdown.trigger();

    match drain(server_task, drain_window).await {
        DrainOutcome::Completed(Ok(())) => tracing::info!("All connections drained"),
        DrainOutcome::Completed(Err(e)) => tracing::error!(error = %e, "Server error during shutdown"),
        DrainOutcome::Failed(e) => tracing::error!(error = %e, "Server task failed"),
        DrainOutcome::Aborted => tracing::warn!("Drain window elapsed, closing remaining connections"),
    }

    release_store(store);
    Ok(())
}

/// Drop the supervisor's store handle and report how many others remain.
///
/// Connections aborted at the end of the drain window still hold theirs
/// until the runtime shuts down.
fn release_store(store: Arc<dyn CounterStore>) -> usize {
    let backend = store.backend();
    let held_elsewhere = Arc::strong_count(&store) - 1;
    drop(store);

    if held_elsewhere == 0 {
        tracing::info!(backend, "Store connection released");
    } else {
        tracing::warn!(
            backend,
            held_elsewhere,
            "Store handle released; aborted connections close with the runtime"
        );
    }
    held_elsewhere
}
