//! Transport-level failures
//!
//! HTTP status codes are not errors at this layer; see [`crate::http`].

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    /// The host did not provide the capability (no HTTP client injected)
    #[error("Capability not available: {0}")]
    NotAvailable(String),

    /// Connect, TLS or body-read failure, or a payload that failed to encode or decode
    #[error("Transport failed: {0}")]
    OperationFailed(String),

    #[error("Request timed out: {0}")]
    Timeout(String),
}

pub type Result<T> = std::result::Result<T, BridgeError>;
