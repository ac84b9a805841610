//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the counter handler as fallback
//! - Wire up middleware (CORS, blocklist, tracing, limits, request ID)
//! - Bind server to listener
//! - Stop accepting on shutdown and drain in-flight requests

use axum::{middleware, Router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{ConfigError, CounterConfig};
use crate::http::handler::count_handler;
use crate::http::middleware::{cors_middleware, CorsPolicy};
use crate::http::request::{MakeCounterRequestId, X_REQUEST_ID};
use crate::security::{blocklist_middleware, Blocklist};
use crate::store::{CounterClient, CounterStore};

/// GET-only service; anything bigger is not a counter request.
const MAX_BODY_BYTES: usize = 16 * 1024;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub counter: CounterClient,
}

/// HTTP server for the counter service.
pub struct CounterServer {
    router: Router,
}

impl CounterServer {
    /// Create a new HTTP server around an already connected store.
    pub fn new(config: CounterConfig, store: Arc<dyn CounterStore>) -> Result<Self, ConfigError> {
        let cors = Arc::new(CorsPolicy::new(&config.cors_origin)?);
        let state = AppState {
            counter: CounterClient::new(store, config.timeouts.store_op),
        };

        let router = Self::build_router(&config, state, cors);
        Ok(Self { router })
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Layers wrap outward: the last one added sees the request first.
    #[allow(deprecated)]
    fn build_router(config: &CounterConfig, state: AppState, cors: Arc<CorsPolicy>) -> Router {
        Router::new()
            .fallback(count_handler)
            .with_state(state)
            .layer(middleware::from_fn_with_state(Arc::new(Blocklist::new()), blocklist_middleware))
            .layer(middleware::from_fn_with_state(cors, cors_middleware))
            .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
            .layer(TimeoutLayer::new(config.timeouts.request))
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeCounterRequestId))
    }

    /// Router with state and layers applied, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server no longer accepting connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
