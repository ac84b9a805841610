//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request (after CORS):
//!     → blocklist.rs (exact / prefix / traversal check)
//!     → Blocked: 302 to decoy, handler never runs
//!     → Allowed: pass to handler
//! ```
//!
//! # Design Decisions
//! - Runs before key validation so scanner traffic never touches the store
//! - Redirect, not 403/404, to avoid confirming path existence
//! - Tables are static; no runtime mutation path

pub mod blocklist;

pub use blocklist::{blocklist_middleware, Blocklist, DECOY_URL};
