//! Error types for the YouTube provider

use bridge_traits::http::HttpResponse;
use bridge_traits::CatalogError;
use thiserror::Error;

use crate::types::ErrorEnvelope;

/// YouTube provider errors
#[derive(Error, Debug)]
pub enum YouTubeError {
    /// The playlist does not exist or is private
    #[error("Playlist not found: {playlist_id}")]
    PlaylistNotFound { playlist_id: String },

    /// Daily or per-request quota exhausted
    #[error("YouTube quota exceeded: {reason}")]
    QuotaExceeded { reason: String },

    /// Playlist exists but its items cannot be read with this key
    #[error("Playlist items not accessible: {reason}")]
    ItemsNotAccessible { reason: String },

    #[error("Forbidden: {reason}")]
    Forbidden { reason: String },

    /// Malformed playlist id or request parameters
    #[error("Invalid playlist id: {message}")]
    InvalidPlaylistId { message: String },

    #[error("YouTube API error (status {status_code}): {message}")]
    ApiError { status_code: u16, message: String },

    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    #[error(transparent)]
    BridgeError(#[from] bridge_traits::error::BridgeError),
}

/// Result type for YouTube operations
pub type Result<T> = std::result::Result<T, YouTubeError>;

impl YouTubeError {
    /// Classify a non-2xx `playlistItems` response.
    pub fn from_response(playlist_id: &str, response: &HttpResponse) -> Self {
        let envelope = response.json::<ErrorEnvelope>().ok();
        let reason = envelope
            .as_ref()
            .map(|e| e.error.reason().to_string())
            .unwrap_or_else(|| response.text_lossy());

        match response.status {
            404 => YouTubeError::PlaylistNotFound {
                playlist_id: playlist_id.to_string(),
            },
            403 => match reason.as_str() {
                "quotaExceeded" | "dailyLimitExceeded" => YouTubeError::QuotaExceeded { reason },
                "playlistItemsNotAccessible" => YouTubeError::ItemsNotAccessible { reason },
                _ => YouTubeError::Forbidden { reason },
            },
            400 => YouTubeError::InvalidPlaylistId { message: reason },
            status_code => YouTubeError::ApiError {
                status_code,
                message: envelope
                    .map(|e| e.error.message)
                    .filter(|m| !m.is_empty())
                    .unwrap_or(reason),
            },
        }
    }
}

impl From<YouTubeError> for CatalogError {
    fn from(error: YouTubeError) -> Self {
        match error {
            YouTubeError::PlaylistNotFound { playlist_id } => CatalogError::NotFound(playlist_id),
            YouTubeError::QuotaExceeded { reason } => CatalogError::QuotaExceeded { reason },
            YouTubeError::ItemsNotAccessible { reason } => {
                CatalogError::ItemsNotAccessible { reason }
            }
            YouTubeError::Forbidden { reason } => CatalogError::AccessForbidden { reason },
            YouTubeError::InvalidPlaylistId { message } => {
                CatalogError::InvalidRequest { message }
            }
            YouTubeError::ApiError {
                status_code,
                message,
            } => CatalogError::Unavailable {
                status: status_code,
                message,
            },
            YouTubeError::ParseError(msg) => CatalogError::InvalidResponse(msg),
            YouTubeError::BridgeError(e) => e.into(),
        }
    }
}
