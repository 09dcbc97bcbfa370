//! Spotify Web API connector implementation
//!
//! Implements the `DestinationCatalog` trait for the Spotify Web API.

use async_trait::async_trait;
use bridge_traits::catalog::{CatalogTrack, CreatedPlaylist, DestinationCatalog, Result};
use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse, RetryPolicy};
use bridge_traits::AccessCredential;
use core_runtime::RateLimitConfig;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::error::SpotifyError;
use crate::types::{AddTracksBody, CreatePlaylistBody, PlaylistObject, SearchResponse};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const PLAYLIST_DESCRIPTION: &str = "Converted from a YouTube playlist";

const OPEN_PLAYLIST_URL: &str = "https://open.spotify.com/playlist";

/// Spotify Web API connector
///
/// Bound to a single access credential for the lifetime of one conversion.
/// HTTP 429 responses are retried with bounded exponential backoff that
/// honors `Retry-After`; once retries run out the call fails with
/// `CatalogError::RateLimited`.
///
/// # Example
///
/// ```ignore
/// use provider_spotify::SpotifyConnector;
/// use bridge_traits::DestinationCatalog;
///
/// let connector = SpotifyConnector::new(http_client, credential, base_url, RateLimitConfig::default());
/// let hit = connector.search_track("Blinding Lights The Weeknd").await?;
/// ```
pub struct SpotifyConnector {
    http_client: Arc<dyn HttpClient>,
    credential: AccessCredential,
    base_url: String,
    rate_limit: RateLimitConfig,
}

impl SpotifyConnector {
    pub fn new(
        http_client: Arc<dyn HttpClient>,
        credential: AccessCredential,
        base_url: impl Into<String>,
        rate_limit: RateLimitConfig,
    ) -> Self {
        Self {
            http_client,
            credential,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            rate_limit,
        }
    }

    fn request(&self, method: HttpMethod, path: &str) -> HttpRequest {
        HttpRequest::new(method, format!("{}{}", self.base_url, path))
            .bearer_token(self.credential.expose())
            .header("Accept", "application/json")
            .timeout(REQUEST_TIMEOUT)
    }

    /// Transport retries are only safe for reads. A POST whose response was
    /// lost may already have been applied, and playlist appends are not
    /// idempotent.
    fn transport_policy(method: HttpMethod) -> RetryPolicy {
        match method {
            HttpMethod::Get => RetryPolicy::default(),
            HttpMethod::Post => RetryPolicy::none(),
        }
    }

    /// Execute a request, retrying on HTTP 429 and classifying failures.
    ///
    /// A 429 means the request was not applied, so writes are replayed too.
    #[instrument(skip(self, request), fields(method = ?request.method))]
    async fn send(&self, request: HttpRequest) -> std::result::Result<HttpResponse, SpotifyError> {
        let policy = Self::transport_policy(request.method);
        let mut retry = 0;

        loop {
            let response = self
                .http_client
                .execute_with_retry(request.clone(), policy)
                .await?;

            if response.is_success() {
                return Ok(response);
            }

            if response.status != 429 {
                let error = SpotifyError::from_response(&response);
                warn!(status = response.status, error = %error, "Spotify request failed");
                return Err(error);
            }

            let retry_after = response.retry_after_seconds();
            retry += 1;

            if retry > self.rate_limit.max_retries {
                let retry_after_seconds = retry_after.unwrap_or_else(|| {
                    self.rate_limit.backoff_for(retry).as_secs_f64().ceil() as u64
                });
                warn!(
                    retries = self.rate_limit.max_retries,
                    retry_after_seconds, "Spotify rate limit persisted after retries"
                );
                return Err(SpotifyError::RateLimitExceeded {
                    retry_after_seconds,
                });
            }

            let wait = self.rate_limit.wait_for(retry, retry_after);
            debug!(
                retry,
                max_retries = self.rate_limit.max_retries,
                wait_ms = wait.as_millis() as u64,
                "Rate limited by Spotify, backing off"
            );
            core_async::time::sleep(wait).await;
        }
    }

    fn convert_playlist(playlist: PlaylistObject, requested_name: &str) -> CreatedPlaylist {
        let external_url = playlist
            .external_urls
            .and_then(|urls| urls.spotify)
            .unwrap_or_else(|| format!("{}/{}", OPEN_PLAYLIST_URL, playlist.id));

        CreatedPlaylist {
            uri: playlist
                .uri
                .unwrap_or_else(|| format!("spotify:playlist:{}", playlist.id)),
            name: playlist.name.unwrap_or_else(|| requested_name.to_string()),
            external_url,
            id: playlist.id,
        }
    }
}

#[async_trait]
impl DestinationCatalog for SpotifyConnector {
    #[instrument(skip(self))]
    async fn search_track(&self, query: &str) -> Result<Option<CatalogTrack>> {
        let path = format!(
            "/search?q={}&type=track&limit=1",
            urlencoding::encode(query)
        );
        let response = self.send(self.request(HttpMethod::Get, &path)).await?;

        let parsed: SearchResponse = response.json().map_err(|e| {
            SpotifyError::ParseError(format!("Failed to parse search response: {}", e))
        })?;

        let hit = parsed
            .tracks
            .and_then(|page| page.items.into_iter().next())
            .map(|track| CatalogTrack {
                uri: track.uri,
                display_name: track.name,
                artists: track.artists.into_iter().map(|a| a.name).collect(),
            });

        debug!(found = hit.is_some(), "Search finished");
        Ok(hit)
    }

    #[instrument(skip(self))]
    async fn create_playlist(
        &self,
        owner_id: &str,
        name: &str,
        public: bool,
    ) -> Result<CreatedPlaylist> {
        let path = format!("/users/{}/playlists", urlencoding::encode(owner_id));
        let body = CreatePlaylistBody {
            name,
            public,
            description: PLAYLIST_DESCRIPTION,
        };
        let request = self
            .request(HttpMethod::Post, &path)
            .json(&body)
            .map_err(SpotifyError::from)?;

        let response = self.send(request).await?;
        let playlist: PlaylistObject = response.json().map_err(|e| {
            SpotifyError::ParseError(format!("Failed to parse created playlist: {}", e))
        })?;

        let created = Self::convert_playlist(playlist, name);
        info!(playlist_id = %created.id, "Created destination playlist");
        Ok(created)
    }

    #[instrument(skip(self, uris), fields(count = uris.len()))]
    async fn add_tracks_to_playlist(&self, playlist_id: &str, uris: &[String]) -> Result<()> {
        let path = format!("/playlists/{}/tracks", urlencoding::encode(playlist_id));
        let request = self
            .request(HttpMethod::Post, &path)
            .json(&AddTracksBody { uris })
            .map_err(SpotifyError::from)?;

        self.send(request).await?;
        Ok(())
    }
}
