//! YouTube Data API response types
//!
//! Data structures for deserializing YouTube Data API v3 responses. Only the
//! fields the converter reads are modelled; everything else is ignored.

use serde::Deserialize;

/// `playlistItems.list` response
///
/// See: https://developers.google.com/youtube/v3/docs/playlistItems/list
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemsResponse {
    #[serde(default)]
    pub items: Vec<PlaylistItem>,

    /// Token for the next page, absent on the last page
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItem {
    #[serde(default)]
    pub snippet: Option<PlaylistItemSnippet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemSnippet {
    #[serde(default)]
    pub title: String,

    /// Channel that uploaded the video (not the playlist owner)
    #[serde(default)]
    pub video_owner_channel_title: Option<String>,
}

/// Google API error envelope: `{"error": {"code", "message", "errors": [...]}}`
#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: u16,

    #[serde(default)]
    pub message: String,

    #[serde(default)]
    pub errors: Vec<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(default)]
    pub reason: String,

    #[serde(default)]
    pub message: String,
}

impl ApiErrorBody {
    /// Machine-readable reason of the first detail, falling back to the
    /// top-level message
    pub fn reason(&self) -> &str {
        self.errors
            .first()
            .map(|detail| detail.reason.as_str())
            .filter(|reason| !reason.is_empty())
            .unwrap_or(self.message.as_str())
    }
}
