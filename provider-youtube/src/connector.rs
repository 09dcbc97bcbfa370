//! YouTube Data API connector implementation
//!
//! Implements the `SourceCatalog` trait for YouTube Data API v3.

use async_trait::async_trait;
use bridge_traits::catalog::{Result, SourceCatalog, SourceItem, SourcePage};
use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse, RetryPolicy};
use core_runtime::logging::redact_url;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::error::YouTubeError;
use crate::types::PlaylistItemsResponse;

/// Largest `maxResults` the playlistItems endpoint accepts
const MAX_PAGE_SIZE: u32 = 50;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// YouTube Data API connector
///
/// Lists playlist items with an API key. Public and unlisted playlists are
/// readable this way; private playlists come back as not found.
///
/// # Example
///
/// ```ignore
/// use provider_youtube::YouTubeConnector;
/// use bridge_traits::SourceCatalog;
///
/// let connector = YouTubeConnector::new(http_client, api_key, base_url);
/// let page = connector.list_playlist_items("PL123", None, 50).await?;
/// ```
pub struct YouTubeConnector {
    http_client: Arc<dyn HttpClient>,
    api_key: String,
    base_url: String,
}

impl YouTubeConnector {
    pub fn new(
        http_client: Arc<dyn HttpClient>,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            http_client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn playlist_items_url(
        &self,
        playlist_id: &str,
        page_cursor: Option<&str>,
        page_size: u32,
    ) -> String {
        let mut url = format!(
            "{}/playlistItems?part=snippet&maxResults={}&playlistId={}&key={}",
            self.base_url,
            page_size.clamp(1, MAX_PAGE_SIZE),
            urlencoding::encode(playlist_id),
            urlencoding::encode(&self.api_key)
        );

        if let Some(token) = page_cursor {
            url.push_str(&format!("&pageToken={}", urlencoding::encode(token)));
        }

        url
    }

    fn convert_page(response: PlaylistItemsResponse) -> SourcePage {
        let items = response
            .items
            .into_iter()
            .filter_map(|item| item.snippet)
            .map(|snippet| {
                let hint = snippet
                    .video_owner_channel_title
                    .filter(|hint| !hint.trim().is_empty());
                SourceItem::new(snippet.title, hint)
            })
            .collect();

        SourcePage {
            items,
            next_cursor: response.next_page_token.filter(|token| !token.is_empty()),
        }
    }

    async fn get(&self, url: String) -> std::result::Result<HttpResponse, YouTubeError> {
        debug!(url = %redact_url(&url), "GET playlistItems");

        let request = HttpRequest::get(url)
            .header("Accept", "application/json")
            .timeout(REQUEST_TIMEOUT);

        Ok(self
            .http_client
            .execute_with_retry(request, RetryPolicy::default())
            .await?)
    }
}

#[async_trait]
impl SourceCatalog for YouTubeConnector {
    #[instrument(skip(self), fields(playlist_id = %playlist_id))]
    async fn list_playlist_items(
        &self,
        playlist_id: &str,
        page_cursor: Option<&str>,
        page_size: u32,
    ) -> Result<SourcePage> {
        let url = self.playlist_items_url(playlist_id, page_cursor, page_size);
        let response = self.get(url).await?;

        if !response.is_success() {
            let error = YouTubeError::from_response(playlist_id, &response);
            warn!(status = response.status, error = %error, "playlistItems request failed");
            return Err(error.into());
        }

        let parsed: PlaylistItemsResponse = serde_json::from_slice(&response.body).map_err(|e| {
            YouTubeError::ParseError(format!("Failed to parse playlistItems response: {}", e))
        })?;

        let page = Self::convert_page(parsed);
        debug!(
            items = page.items.len(),
            has_next = page.next_cursor.is_some(),
            "Fetched playlist page"
        );

        Ok(page)
    }
}
