//! Time-related abstractions.
//!
//! ```rust
//! use core_async::time::{sleep, Duration, Instant};
//!
//! async fn example() {
//!     let start = Instant::now();
//!     sleep(Duration::from_millis(5)).await;
//!     assert!(start.elapsed() >= Duration::from_millis(5));
//! }
//! ```

pub use tokio::time::sleep;

pub use std::time::{Duration, Instant};
