//! Spotify Web API request and response types

use serde::{Deserialize, Serialize};

/// `GET /search?type=track` response
///
/// See: https://developer.spotify.com/documentation/web-api/reference/search
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub tracks: Option<TrackPage>,
}

#[derive(Debug, Deserialize)]
pub struct TrackPage {
    #[serde(default)]
    pub items: Vec<TrackObject>,
}

#[derive(Debug, Deserialize)]
pub struct TrackObject {
    pub uri: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub artists: Vec<ArtistObject>,
}

#[derive(Debug, Deserialize)]
pub struct ArtistObject {
    #[serde(default)]
    pub name: String,
}

/// Body of `POST /users/{user_id}/playlists`
#[derive(Debug, Serialize)]
pub struct CreatePlaylistBody<'a> {
    pub name: &'a str,
    pub public: bool,
    pub description: &'a str,
}

/// Playlist object returned on creation
#[derive(Debug, Deserialize)]
pub struct PlaylistObject {
    pub id: String,
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub external_urls: Option<ExternalUrls>,
}

#[derive(Debug, Deserialize)]
pub struct ExternalUrls {
    #[serde(default)]
    pub spotify: Option<String>,
}

/// Body of `POST /playlists/{playlist_id}/tracks`
#[derive(Debug, Serialize)]
pub struct AddTracksBody<'a> {
    pub uris: &'a [String],
}

/// Regular error object: `{"error": {"status": 401, "message": "..."}}`
#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorObject,
}

#[derive(Debug, Deserialize)]
pub struct ErrorObject {
    #[serde(default)]
    pub status: u16,
    #[serde(default)]
    pub message: String,
}
