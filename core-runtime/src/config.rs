//! # Converter Configuration Module
//!
//! Provides configuration management for the playlist conversion core.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a
//! `ConverterConfig` holding the HTTP bridge, the catalog endpoints and the
//! pipeline tuning knobs. Validation is fail-fast: a config that builds is a
//! config the pipeline can run with.
//!
//! ## Required Settings
//!
//! - `youtube_api_key` - Key for the YouTube Data API
//! - `HttpClient` - Optional when the `desktop-shims` feature injects
//!   `ReqwestHttpClient`, required otherwise
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::ConverterConfig;
//!
//! let config = ConverterConfig::builder()
//!     .youtube_api_key("AIza...")
//!     .match_concurrency(8)
//!     .build()
//!     .expect("Failed to build config");
//! ```

use crate::error::{Error, Result};
use bridge_traits::HttpClient;
use std::sync::Arc;
use std::time::Duration;

/// Production YouTube Data API base URL
pub const DEFAULT_YOUTUBE_API_BASE: &str = "https://www.googleapis.com/youtube/v3";

/// Production Spotify Web API base URL
pub const DEFAULT_SPOTIFY_API_BASE: &str = "https://api.spotify.com/v1";

/// Page size used when listing source playlist items
pub const DEFAULT_FETCH_PAGE_SIZE: u32 = 50;

/// Largest page the source catalog accepts
pub const MAX_FETCH_PAGE_SIZE: u32 = 50;

/// Concurrent in-flight searches against the destination catalog
pub const DEFAULT_MATCH_CONCURRENCY: usize = 5;

/// Upper bound on concurrent searches
pub const MAX_MATCH_CONCURRENCY: usize = 10;

/// Track URIs per playlist write call
pub const DEFAULT_WRITE_CHUNK_SIZE: usize = 100;

/// Largest chunk the destination catalog accepts in one write
pub const MAX_WRITE_CHUNK_SIZE: usize = 100;

/// Name used when the request does not supply one
pub const DEFAULT_PLAYLIST_NAME: &str = "Converted YouTube Playlist";

/// Which credential backs destination-catalog searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchCredentialPolicy {
    /// Use the dedicated search credential when the caller supplies one,
    /// otherwise search with the user's own credential.
    #[default]
    FallbackToUser,

    /// Refuse to convert unless a dedicated search credential is supplied.
    RequireDedicated,
}

/// Bounded exponential backoff applied to HTTP 429 responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Retries after the first rate-limited response
    pub max_retries: u32,

    /// Delay before the first retry when no `Retry-After` is given
    pub base_delay_ms: u64,

    /// Cap on any single wait, including server-provided `Retry-After`
    pub max_delay_ms: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay_ms: 500,
            max_delay_ms: 8_000,
        }
    }
}

impl RateLimitConfig {
    /// Backoff before the given retry (1-based), ignoring `Retry-After`
    pub fn backoff_for(&self, retry: u32) -> Duration {
        let factor = 2u64.saturating_pow(retry.saturating_sub(1));
        Duration::from_millis(
            self.base_delay_ms
                .saturating_mul(factor)
                .min(self.max_delay_ms),
        )
    }

    /// Wait before the given retry, preferring the server's hint
    pub fn wait_for(&self, retry: u32, retry_after_seconds: Option<u64>) -> Duration {
        match retry_after_seconds {
            Some(seconds) => {
                Duration::from_millis(seconds.saturating_mul(1000).min(self.max_delay_ms))
            }
            None => self.backoff_for(retry),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_retries > 5 {
            return Err(Error::Config(
                "Rate limit retries exceed maximum of 5".to_string(),
            ));
        }

        if self.base_delay_ms == 0 {
            return Err(Error::Config(
                "Rate limit base delay must be greater than 0ms".to_string(),
            ));
        }

        if self.max_delay_ms < self.base_delay_ms {
            return Err(Error::Config(
                "Rate limit max delay must not be smaller than the base delay".to_string(),
            ));
        }

        Ok(())
    }
}

/// Configuration for the conversion core.
///
/// Use [`ConverterConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct ConverterConfig {
    /// HTTP transport shared by every request-scoped connector
    pub http_client: Arc<dyn HttpClient>,

    /// YouTube Data API key
    pub youtube_api_key: String,

    /// YouTube Data API base URL
    pub youtube_api_base: String,

    /// Spotify Web API base URL
    pub spotify_api_base: String,

    /// Items requested per source page
    pub fetch_page_size: u32,

    /// Concurrent per-track searches
    pub match_concurrency: usize,

    /// Track URIs per write call
    pub write_chunk_size: usize,

    /// Destination playlist name when the request has none
    pub default_playlist_name: String,

    /// Whether created playlists are public
    pub playlist_public: bool,

    /// HTTP 429 handling for the destination catalog
    pub rate_limit: RateLimitConfig,

    /// Which credential backs destination searches
    pub search_credential_policy: SearchCredentialPolicy,
}

impl std::fmt::Debug for ConverterConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConverterConfig")
            .field("http_client", &"HttpClient { ... }")
            .field("youtube_api_key", &"[REDACTED]")
            .field("youtube_api_base", &self.youtube_api_base)
            .field("spotify_api_base", &self.spotify_api_base)
            .field("fetch_page_size", &self.fetch_page_size)
            .field("match_concurrency", &self.match_concurrency)
            .field("write_chunk_size", &self.write_chunk_size)
            .field("default_playlist_name", &self.default_playlist_name)
            .field("playlist_public", &self.playlist_public)
            .field("rate_limit", &self.rate_limit)
            .field("search_credential_policy", &self.search_credential_policy)
            .finish()
    }
}

impl ConverterConfig {
    /// Creates a new builder for constructing a `ConverterConfig`.
    pub fn builder() -> ConverterConfigBuilder {
        ConverterConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.youtube_api_key.trim().is_empty() {
            return Err(Error::Config("YouTube API key cannot be empty".to_string()));
        }

        validate_base_url("YouTube API base", &self.youtube_api_base)?;
        validate_base_url("Spotify API base", &self.spotify_api_base)?;

        if self.fetch_page_size == 0 || self.fetch_page_size > MAX_FETCH_PAGE_SIZE {
            return Err(Error::Config(format!(
                "Fetch page size must be between 1 and {}",
                MAX_FETCH_PAGE_SIZE
            )));
        }

        if self.match_concurrency == 0 || self.match_concurrency > MAX_MATCH_CONCURRENCY {
            return Err(Error::Config(format!(
                "Match concurrency must be between 1 and {}",
                MAX_MATCH_CONCURRENCY
            )));
        }

        if self.write_chunk_size == 0 || self.write_chunk_size > MAX_WRITE_CHUNK_SIZE {
            return Err(Error::Config(format!(
                "Write chunk size must be between 1 and {}",
                MAX_WRITE_CHUNK_SIZE
            )));
        }

        if self.default_playlist_name.trim().is_empty() {
            return Err(Error::Config(
                "Default playlist name cannot be empty".to_string(),
            ));
        }

        self.rate_limit.validate()
    }
}

fn validate_base_url(label: &str, value: &str) -> Result<()> {
    if value.starts_with("https://") || value.starts_with("http://") {
        Ok(())
    } else {
        Err(Error::Config(format!(
            "{} must be an http(s) URL, got '{}'",
            label, value
        )))
    }
}

#[cfg(not(feature = "desktop-shims"))]
fn http_client_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "HttpClient".to_string(),
        message: "No HTTP client implementation provided. \
                 Desktop: ensure the 'desktop-shims' feature is enabled to use ReqwestHttpClient. \
                 Tests: inject a scripted HttpClient."
            .to_string(),
    }
}

#[cfg(feature = "desktop-shims")]
fn provide_default_http_client() -> Result<Arc<dyn HttpClient>> {
    use bridge_desktop::ReqwestHttpClient;

    let client = ReqwestHttpClient::new().map_err(|e| Error::CapabilityMissing {
        capability: "HttpClient".to_string(),
        message: e.to_string(),
    })?;
    tracing::debug!("Using default ReqwestHttpClient");
    let client: Arc<dyn HttpClient> = Arc::new(client);
    Ok(client)
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_http_client() -> Result<Arc<dyn HttpClient>> {
    Err(http_client_missing_error())
}

/// Builder for constructing [`ConverterConfig`] instances.
#[derive(Default)]
pub struct ConverterConfigBuilder {
    http_client: Option<Arc<dyn HttpClient>>,
    youtube_api_key: Option<String>,
    youtube_api_base: Option<String>,
    spotify_api_base: Option<String>,
    fetch_page_size: Option<u32>,
    match_concurrency: Option<usize>,
    write_chunk_size: Option<usize>,
    default_playlist_name: Option<String>,
    playlist_public: bool,
    rate_limit: Option<RateLimitConfig>,
    search_credential_policy: SearchCredentialPolicy,
}

impl ConverterConfigBuilder {
    /// Sets the HTTP client used by every connector.
    pub fn http_client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Sets the YouTube Data API key (required).
    pub fn youtube_api_key(mut self, key: impl Into<String>) -> Self {
        self.youtube_api_key = Some(key.into());
        self
    }

    /// Overrides the YouTube Data API base URL.
    pub fn youtube_api_base(mut self, base: impl Into<String>) -> Self {
        self.youtube_api_base = Some(base.into());
        self
    }

    /// Overrides the Spotify Web API base URL.
    pub fn spotify_api_base(mut self, base: impl Into<String>) -> Self {
        self.spotify_api_base = Some(base.into());
        self
    }

    /// Items requested per source page. Default: 50
    pub fn fetch_page_size(mut self, size: u32) -> Self {
        self.fetch_page_size = Some(size);
        self
    }

    /// Concurrent per-track searches. Default: 5
    pub fn match_concurrency(mut self, concurrency: usize) -> Self {
        self.match_concurrency = Some(concurrency);
        self
    }

    /// Track URIs per write call. Default: 100
    pub fn write_chunk_size(mut self, size: usize) -> Self {
        self.write_chunk_size = Some(size);
        self
    }

    pub fn default_playlist_name(mut self, name: impl Into<String>) -> Self {
        self.default_playlist_name = Some(name.into());
        self
    }

    pub fn playlist_public(mut self, public: bool) -> Self {
        self.playlist_public = public;
        self
    }

    pub fn rate_limit(mut self, rate_limit: RateLimitConfig) -> Self {
        self.rate_limit = Some(rate_limit);
        self
    }

    pub fn search_credential_policy(mut self, policy: SearchCredentialPolicy) -> Self {
        self.search_credential_policy = policy;
        self
    }

    /// Builds the final configuration.
    ///
    /// # Errors
    ///
    /// - `Error::Config` when the API key is missing or a value is out of range
    /// - `Error::CapabilityMissing` when no `HttpClient` is available
    pub fn build(self) -> Result<ConverterConfig> {
        let youtube_api_key = self.youtube_api_key.ok_or_else(|| {
            Error::Config(
                "YouTube API key is required. Use .youtube_api_key() to set it.".to_string(),
            )
        })?;

        let http_client = match self.http_client {
            Some(client) => client,
            None => provide_default_http_client()?,
        };

        let config = ConverterConfig {
            http_client,
            youtube_api_key,
            youtube_api_base: self
                .youtube_api_base
                .unwrap_or_else(|| DEFAULT_YOUTUBE_API_BASE.to_string()),
            spotify_api_base: self
                .spotify_api_base
                .unwrap_or_else(|| DEFAULT_SPOTIFY_API_BASE.to_string()),
            fetch_page_size: self.fetch_page_size.unwrap_or(DEFAULT_FETCH_PAGE_SIZE),
            match_concurrency: self.match_concurrency.unwrap_or(DEFAULT_MATCH_CONCURRENCY),
            write_chunk_size: self.write_chunk_size.unwrap_or(DEFAULT_WRITE_CHUNK_SIZE),
            default_playlist_name: self
                .default_playlist_name
                .unwrap_or_else(|| DEFAULT_PLAYLIST_NAME.to_string()),
            playlist_public: self.playlist_public,
            rate_limit: self.rate_limit.unwrap_or_default(),
            search_credential_policy: self.search_credential_policy,
        };

        config.validate()?;

        Ok(config)
    }
}
