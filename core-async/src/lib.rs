//! Runtime abstraction layer for the playlist bridge core.
//!
//! All `core-*` and `provider-*` crates depend on this crate instead of
//! reaching for Tokio directly, so the executor choice stays in one place.
//!
//! # Modules
//!
//! - `task`: Task spawning and join handles
//! - `time`: Sleep and instants
//! - `sync`: Semaphores and cooperative cancellation
//!
//! # Examples
//!
//! ```rust
//! use core_async::task;
//! use core_async::time::{sleep, Duration};
//!
//! async fn example() {
//!     let handle = task::spawn(async {
//!         sleep(Duration::from_millis(10)).await;
//!         42
//!     });
//!     assert_eq!(handle.await.unwrap(), 42);
//! }
//! ```

pub mod sync;
pub mod task;
pub mod time;

pub use task::spawn;
pub use time::{sleep, Duration, Instant};
