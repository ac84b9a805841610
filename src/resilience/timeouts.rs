//! Timeout enforcement.
//!
//! # Responsibilities
//! - Wrap store calls with a deadline
//! - Cancel the pending call cleanly when the deadline passes
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - Timeout errors are distinct from other errors
//! - Timed-out requests return 504 Gateway Timeout

use std::future::Future;
use std::time::Duration;

use crate::store::StoreError;

/// Run `fut` with a deadline. Expiry drops the future and yields [`StoreError::Deadline`].
pub async fn with_deadline<F, T>(deadline: Duration, fut: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    match tokio::time::timeout(deadline, fut).await {
        Ok(result) => result,
        Err(_) => Err(StoreError::Deadline),
    }
}
