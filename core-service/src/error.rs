use core_convert::ErrorCategory;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Service initialization failed: {0}")]
    InitializationFailed(#[from] core_runtime::Error),

    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("A dedicated search credential is required but was not supplied")]
    SearchCredentialUnavailable,
}

impl ServiceError {
    /// Stable machine-readable kind, in the same namespace as conversion kinds
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::InitializationFailed(_) => "initialization_failed",
            ServiceError::InvalidRequest { .. } => "invalid_request",
            ServiceError::SearchCredentialUnavailable => "search_credential_unavailable",
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ServiceError::InitializationFailed(_) => ErrorCategory::Fatal,
            ServiceError::InvalidRequest { .. } | ServiceError::SearchCredentialUnavailable => {
                ErrorCategory::ClientInput
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;
