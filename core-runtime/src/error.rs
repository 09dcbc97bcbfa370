//! Startup failures: bad configuration or a missing host capability

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A configuration value or logging setting was rejected
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// No HTTP client was injected and none could be built
    #[error("Missing capability {capability}: {message}")]
    CapabilityMissing { capability: String, message: String },
}

pub type Result<T> = std::result::Result<T, Error>;
