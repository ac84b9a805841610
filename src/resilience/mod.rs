//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request to store:
//!     → timeouts.rs (enforce per-request deadline)
//!     → On failure: classify and answer, no retry
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every external call has a deadline
//! - A single attempt per request; callers retry at a higher layer

pub mod timeouts;
