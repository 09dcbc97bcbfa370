//! Task spawning abstractions.
//!
//! Tasks are `Send + 'static` and may be moved between worker threads.
//!
//! # Examples
//!
//! ```rust
//! use core_async::task;
//!
//! async fn example() {
//!     let handle = task::spawn(async { 42 });
//!     let result = handle.await.unwrap();
//!     assert_eq!(result, 42);
//! }
//! ```

pub use tokio::task::{JoinError, JoinHandle};

/// Spawns a new asynchronous task on the current runtime.
///
/// The returned `JoinHandle` resolves to the task output, or to a
/// `JoinError` when the task panicked or was aborted.
pub fn spawn<F>(future: F) -> JoinHandle<F::Output>
where
    F: std::future::Future + Send + 'static,
    F::Output: Send + 'static,
{
    tokio::task::spawn(future)
}

/// Result type for task operations.
pub type Result<T> = std::result::Result<T, JoinError>;
