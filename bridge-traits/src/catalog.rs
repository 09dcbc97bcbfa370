//! Media Catalog Abstractions
//!
//! Contracts for the two external catalogs a conversion talks to: the
//! source catalog hosting the playlist and the destination catalog the new
//! playlist is written to.
//!
//! Connectors classify every upstream failure into [`CatalogError`] exactly
//! once, so callers match on the variant and never on HTTP status codes or
//! nested reason strings.

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// Opaque bearer token issued by the auth collaborator.
///
/// The token is never printed; `Debug` shows a redacted placeholder.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessCredential(String);

impl AccessCredential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Raw token, for building the `Authorization` header only
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for AccessCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessCredential([REDACTED])")
    }
}

/// One raw playlist entry as returned by the source catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceItem {
    pub title: String,
    pub artist_hint: Option<String>,
}

impl SourceItem {
    pub fn new(title: impl Into<String>, artist_hint: Option<String>) -> Self {
        Self {
            title: title.into(),
            artist_hint,
        }
    }
}

/// One page of playlist items plus the cursor for the next page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourcePage {
    pub items: Vec<SourceItem>,
    pub next_cursor: Option<String>,
}

/// Best search hit in the destination catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogTrack {
    pub uri: String,
    pub display_name: String,
    pub artists: Vec<String>,
}

/// Playlist created in the destination catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedPlaylist {
    pub id: String,
    pub uri: String,
    pub name: String,
    pub external_url: String,
}

/// Classified catalog failure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Quota exceeded: {reason}")]
    QuotaExceeded { reason: String },

    #[error("Items not accessible: {reason}")]
    ItemsNotAccessible { reason: String },

    #[error("Access forbidden: {reason}")]
    AccessForbidden { reason: String },

    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("Rate limited, retry after {retry_after_seconds} seconds")]
    RateLimited { retry_after_seconds: u64 },

    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("Upstream unavailable (status {status}): {message}")]
    Unavailable { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl CatalogError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, CatalogError::RateLimited { .. })
    }

    /// Upstream HTTP status, when the failure came from a response
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            CatalogError::NotFound(_) => Some(404),
            CatalogError::QuotaExceeded { .. }
            | CatalogError::ItemsNotAccessible { .. }
            | CatalogError::AccessForbidden { .. } => Some(403),
            CatalogError::InvalidRequest { .. } => Some(400),
            CatalogError::RateLimited { .. } => Some(429),
            CatalogError::Unauthorized { .. } => Some(401),
            CatalogError::Unavailable { status, .. } => Some(*status),
            CatalogError::Transport(_) | CatalogError::InvalidResponse(_) => None,
        }
    }
}

impl From<crate::error::BridgeError> for CatalogError {
    fn from(error: crate::error::BridgeError) -> Self {
        CatalogError::Transport(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;

/// Source catalog: the service hosting the playlist being converted
#[async_trait]
pub trait SourceCatalog: Send + Sync {
    /// Fetch one page of playlist items.
    ///
    /// `page_cursor` is `None` for the first page and the previous page's
    /// `next_cursor` afterwards.
    async fn list_playlist_items(
        &self,
        playlist_id: &str,
        page_cursor: Option<&str>,
        page_size: u32,
    ) -> Result<SourcePage>;
}

/// Destination catalog: the service the new playlist is created in
#[async_trait]
pub trait DestinationCatalog: Send + Sync {
    /// Return the best hit for `query`, or `None` when nothing matched
    async fn search_track(&self, query: &str) -> Result<Option<CatalogTrack>>;

    async fn create_playlist(
        &self,
        owner_id: &str,
        name: &str,
        public: bool,
    ) -> Result<CreatedPlaylist>;

    /// Append `uris` to the playlist in a single call
    async fn add_tracks_to_playlist(&self, playlist_id: &str, uris: &[String]) -> Result<()>;
}
