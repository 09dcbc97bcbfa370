//! Conversion error taxonomy
//!
//! Every way a conversion can stop early is a distinct [`ConversionError`]
//! variant with a stable [`ErrorKind`] and a surfaced [`ErrorCategory`].
//! Catalog failures arrive already classified as `CatalogError` and are
//! mapped here once, depending on the stage that produced them.

use bridge_traits::CatalogError;
use serde::Serialize;
use thiserror::Error;

/// Cancellable pipeline stage, recorded when a conversion is cancelled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Fetch,
    Match,
    Write,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Fetch => "fetch",
            Stage::Match => "match",
            Stage::Write => "write",
        };
        f.write_str(name)
    }
}

/// Stable machine-readable error kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidPlaylistUrl,
    InvalidPlaylistIdFormat,
    PlaylistNotFoundOrPrivate,
    EmptySourcePlaylist,
    QuotaExceeded,
    ItemsNotAccessible,
    AccessForbidden,
    UpstreamUnavailable,
    NoMatchesFound,
    PlaylistCreateFailed,
    Cancelled,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidPlaylistUrl => "invalid_playlist_url",
            ErrorKind::InvalidPlaylistIdFormat => "invalid_playlist_id_format",
            ErrorKind::PlaylistNotFoundOrPrivate => "playlist_not_found_or_private",
            ErrorKind::EmptySourcePlaylist => "empty_source_playlist",
            ErrorKind::QuotaExceeded => "quota_exceeded",
            ErrorKind::ItemsNotAccessible => "items_not_accessible",
            ErrorKind::AccessForbidden => "access_forbidden",
            ErrorKind::UpstreamUnavailable => "upstream_unavailable",
            ErrorKind::NoMatchesFound => "no_matches_found",
            ErrorKind::PlaylistCreateFailed => "playlist_create_failed",
            ErrorKind::Cancelled => "cancelled",
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ErrorKind::InvalidPlaylistUrl | ErrorKind::InvalidPlaylistIdFormat => {
                ErrorCategory::ClientInput
            }
            ErrorKind::PlaylistNotFoundOrPrivate | ErrorKind::EmptySourcePlaylist => {
                ErrorCategory::NotFound
            }
            ErrorKind::QuotaExceeded
            | ErrorKind::ItemsNotAccessible
            | ErrorKind::AccessForbidden
            | ErrorKind::UpstreamUnavailable => ErrorCategory::Upstream,
            ErrorKind::NoMatchesFound => ErrorCategory::ReportedOutcome,
            ErrorKind::PlaylistCreateFailed => ErrorCategory::Fatal,
            ErrorKind::Cancelled => ErrorCategory::Cancelled,
        }
    }
}

/// How an error is surfaced to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    ClientInput,
    NotFound,
    Upstream,
    /// Not a failure: a complete diagnostic outcome
    ReportedOutcome,
    Fatal,
    Cancelled,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    #[error("Invalid playlist URL '{url}': {reason}")]
    InvalidPlaylistUrl { url: String, reason: String },

    #[error("Invalid playlist id format: {message}")]
    InvalidPlaylistIdFormat { message: String },

    #[error("Playlist {playlist_id} not found or private")]
    PlaylistNotFoundOrPrivate { playlist_id: String },

    #[error("Source playlist {playlist_id} has no available tracks")]
    EmptySourcePlaylist { playlist_id: String },

    #[error("Quota exceeded: {reason}")]
    QuotaExceeded { reason: String },

    #[error("Playlist items not accessible: {reason}")]
    ItemsNotAccessible { reason: String },

    #[error("Access forbidden: {reason}")]
    AccessForbidden { reason: String },

    #[error("Upstream unavailable{}: {message}", status_suffix(.status))]
    UpstreamUnavailable { status: Option<u16>, message: String },

    #[error("No matches found for any of {total_source_tracks} tracks")]
    NoMatchesFound {
        total_source_tracks: usize,
        unmatched_titles: Vec<String>,
    },

    #[error("Failed to create destination playlist: {message}")]
    PlaylistCreateFailed {
        message: String,
        upstream_status: Option<u16>,
    },

    #[error("Conversion cancelled during {stage}")]
    Cancelled { stage: Stage },
}

fn status_suffix(status: &Option<u16>) -> String {
    status
        .map(|status| format!(" (status {})", status))
        .unwrap_or_default()
}

impl ConversionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConversionError::InvalidPlaylistUrl { .. } => ErrorKind::InvalidPlaylistUrl,
            ConversionError::InvalidPlaylistIdFormat { .. } => ErrorKind::InvalidPlaylistIdFormat,
            ConversionError::PlaylistNotFoundOrPrivate { .. } => {
                ErrorKind::PlaylistNotFoundOrPrivate
            }
            ConversionError::EmptySourcePlaylist { .. } => ErrorKind::EmptySourcePlaylist,
            ConversionError::QuotaExceeded { .. } => ErrorKind::QuotaExceeded,
            ConversionError::ItemsNotAccessible { .. } => ErrorKind::ItemsNotAccessible,
            ConversionError::AccessForbidden { .. } => ErrorKind::AccessForbidden,
            ConversionError::UpstreamUnavailable { .. } => ErrorKind::UpstreamUnavailable,
            ConversionError::NoMatchesFound { .. } => ErrorKind::NoMatchesFound,
            ConversionError::PlaylistCreateFailed { .. } => ErrorKind::PlaylistCreateFailed,
            ConversionError::Cancelled { .. } => ErrorKind::Cancelled,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        self.kind().category()
    }

    /// Classify a source-catalog failure raised while fetching `playlist_id`.
    pub fn from_fetch(playlist_id: &str, error: CatalogError) -> Self {
        match error {
            CatalogError::NotFound(_) => ConversionError::PlaylistNotFoundOrPrivate {
                playlist_id: playlist_id.to_string(),
            },
            CatalogError::QuotaExceeded { reason } => ConversionError::QuotaExceeded { reason },
            CatalogError::ItemsNotAccessible { reason } => {
                ConversionError::ItemsNotAccessible { reason }
            }
            CatalogError::AccessForbidden { reason } => ConversionError::AccessForbidden { reason },
            CatalogError::Unauthorized { message } => {
                ConversionError::AccessForbidden { reason: message }
            }
            CatalogError::InvalidRequest { message } => {
                ConversionError::InvalidPlaylistIdFormat { message }
            }
            other => ConversionError::UpstreamUnavailable {
                status: other.upstream_status(),
                message: other.to_string(),
            },
        }
    }

    /// Classify a destination failure raised while creating the playlist.
    pub fn from_create(error: CatalogError) -> Self {
        ConversionError::PlaylistCreateFailed {
            upstream_status: error.upstream_status(),
            message: error.to_string(),
        }
    }
}

/// Counts computed before an early exit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialProgress {
    pub total_source_tracks: Option<usize>,
    pub matched_count: Option<usize>,
    pub unmatched_titles: Vec<String>,
    pub destination_playlist_id: Option<String>,
    pub tracks_written: Option<usize>,
}

/// An early termination plus whatever was known when it happened
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{error}")]
pub struct ConversionFailure {
    pub error: ConversionError,
    pub progress: PartialProgress,
}

impl ConversionFailure {
    pub fn new(error: ConversionError, progress: PartialProgress) -> Self {
        Self { error, progress }
    }

    pub fn kind(&self) -> ErrorKind {
        self.error.kind()
    }
}

impl From<ConversionError> for ConversionFailure {
    fn from(error: ConversionError) -> Self {
        Self::new(error, PartialProgress::default())
    }
}

pub type Result<T> = std::result::Result<T, ConversionError>;
