//! Error types for the Spotify provider

use bridge_traits::http::HttpResponse;
use bridge_traits::CatalogError;
use thiserror::Error;

use crate::types::ErrorEnvelope;

/// Spotify provider errors
#[derive(Error, Debug)]
pub enum SpotifyError {
    /// Token missing, expired or revoked
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Token lacks the scope for this call, or the user is not allowed
    #[error("Access forbidden: {0}")]
    Forbidden(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Rate limit still in effect after the configured retries
    #[error("Rate limit exceeded, retry after {retry_after_seconds} seconds")]
    RateLimitExceeded { retry_after_seconds: u64 },

    #[error("Spotify API error (status {status_code}): {message}")]
    ApiError { status_code: u16, message: String },

    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    #[error(transparent)]
    BridgeError(#[from] bridge_traits::error::BridgeError),
}

/// Result type for Spotify operations
pub type Result<T> = std::result::Result<T, SpotifyError>;

impl SpotifyError {
    /// Classify a non-2xx, non-429 response.
    pub fn from_response(response: &HttpResponse) -> Self {
        let message = response
            .json::<ErrorEnvelope>()
            .ok()
            .map(|envelope| envelope.error.message)
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| response.text_lossy());

        match response.status {
            400 => SpotifyError::BadRequest(message),
            401 => SpotifyError::AuthenticationFailed(message),
            403 => SpotifyError::Forbidden(message),
            404 => SpotifyError::NotFound(message),
            status_code => SpotifyError::ApiError {
                status_code,
                message,
            },
        }
    }
}

impl From<SpotifyError> for CatalogError {
    fn from(error: SpotifyError) -> Self {
        match error {
            SpotifyError::AuthenticationFailed(message) => CatalogError::Unauthorized { message },
            SpotifyError::Forbidden(reason) => CatalogError::AccessForbidden { reason },
            SpotifyError::NotFound(what) => CatalogError::NotFound(what),
            SpotifyError::BadRequest(message) => CatalogError::InvalidRequest { message },
            SpotifyError::RateLimitExceeded {
                retry_after_seconds,
            } => CatalogError::RateLimited {
                retry_after_seconds,
            },
            SpotifyError::ApiError {
                status_code,
                message,
            } => CatalogError::Unavailable {
                status: status_code,
                message,
            },
            SpotifyError::ParseError(msg) => CatalogError::InvalidResponse(msg),
            SpotifyError::BridgeError(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use std::collections::HashMap;

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: HashMap::new(),
            body: Bytes::from(body.to_string()),
        }
    }

    #[test]
    fn test_status_classification() {
        let body = r#"{"error": {"status": 401, "message": "The access token expired"}}"#;
        let error = SpotifyError::from_response(&response(401, body));
        assert_eq!(error.to_string(), "Authentication failed: The access token expired");

        assert!(matches!(
            SpotifyError::from_response(&response(403, "{}")),
            SpotifyError::Forbidden(_)
        ));
        assert!(matches!(
            SpotifyError::from_response(&response(404, "")),
            SpotifyError::NotFound(_)
        ));
        assert!(matches!(
            SpotifyError::from_response(&response(400, "")),
            SpotifyError::BadRequest(_)
        ));
        assert!(matches!(
            SpotifyError::from_response(&response(502, "Bad gateway")),
            SpotifyError::ApiError { status_code: 502, .. }
        ));
    }

    #[test]
    fn test_rate_limit_maps_to_catalog_rate_limited() {
        let catalog: CatalogError = SpotifyError::RateLimitExceeded {
            retry_after_seconds: 7,
        }
        .into();

        assert_eq!(
            catalog,
            CatalogError::RateLimited {
                retry_after_seconds: 7
            }
        );
    }

    #[test]
    fn test_unauthorized_maps_through() {
        let catalog: CatalogError = SpotifyError::AuthenticationFailed("expired".into()).into();
        assert_eq!(catalog.upstream_status(), Some(401));
    }
}
