//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, tracing, request ID, limits)
//!     → middleware/cors.rs (CORS headers, OPTIONS short-circuit)
//!     → security::blocklist (scanner paths redirected)
//!     → handler.rs (method + path dispatch, key validation, increment)
//!     → response.rs (JSON body or error envelope)
//!     → Send to client
//! ```

pub mod handler;
pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use request::{MakeCounterRequestId, X_REQUEST_ID};
pub use response::{ApiError, CountBody, ErrorBody};
pub use server::{AppState, CounterServer};
