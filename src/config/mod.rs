//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! command line flags / environment variables / .env file
//!     → loader.rs (clap parse, env fallback)
//!     → validation.rs (semantic checks)
//!     → CounterConfig (validated, immutable)
//!     → handed to lifecycle and HTTP server at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - Everything except the store URL has a default
//! - Validation separates syntactic (clap) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_env_file, ConfigError, CounterArgs};
pub use schema::{CounterConfig, LogFormat, ObservabilityConfig, StoreBackend, TimeoutConfig};
pub use validation::ValidationError;
