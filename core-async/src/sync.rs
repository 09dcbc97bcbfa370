//! Synchronization primitives.
//!
//! The semaphore that bounds concurrent catalog searches, and the
//! cooperative [`CancellationToken`] from `tokio-util`. Both are
//! `Send + Sync` and safe to share across tasks.
//!
//! # Examples
//!
//! ```rust
//! use core_async::sync::{CancellationToken, Semaphore};
//! use std::sync::Arc;
//!
//! async fn example() {
//!     let permits = Arc::new(Semaphore::new(2));
//!     let _permit = permits.clone().acquire_owned().await.unwrap();
//!     assert_eq!(permits.available_permits(), 1);
//!
//!     let token = CancellationToken::new();
//!     token.cancel();
//!     assert!(token.is_cancelled());
//! }
//! ```

use std::sync::Arc;

pub use tokio::sync::{OwnedSemaphorePermit, Semaphore};

pub use tokio_util::sync::CancellationToken;

/// Wait for a permit, giving up as soon as `cancel` fires.
///
/// Returns `None` when cancelled or when the semaphore was closed.
pub async fn acquire_unless_cancelled(
    semaphore: Arc<Semaphore>,
    cancel: &CancellationToken,
) -> Option<OwnedSemaphorePermit> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => None,
        permit = semaphore.acquire_owned() => permit.ok(),
    }
}
