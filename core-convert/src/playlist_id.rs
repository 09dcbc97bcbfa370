//! Playlist URL parsing
//!
//! Accepts `youtube.com` (plus the `www.`, `m.` and `music.` hosts) with a
//! `list` query parameter on any path, and the `youtu.be` short link only
//! under `/playlist`. No network access.

use url::Url;

use crate::error::{ConversionError, Result};

const PLAYLIST_PARAM: &str = "list";

const FULL_HOSTS: &[&str] = &[
    "youtube.com",
    "www.youtube.com",
    "m.youtube.com",
    "music.youtube.com",
];

const SHORT_HOST: &str = "youtu.be";
const SHORT_PLAYLIST_PATH: &str = "/playlist";

fn invalid(url: &str, reason: impl Into<String>) -> ConversionError {
    ConversionError::InvalidPlaylistUrl {
        url: url.to_string(),
        reason: reason.into(),
    }
}

/// Extract the playlist identifier from a source playlist URL.
pub fn extract_playlist_id(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    let parsed = Url::parse(trimmed).map_err(|e| invalid(trimmed, e.to_string()))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid(trimmed, "unsupported scheme"));
    }

    let host = parsed
        .host_str()
        .map(|host| host.to_ascii_lowercase())
        .ok_or_else(|| invalid(trimmed, "missing host"))?;

    let accepted = if FULL_HOSTS.contains(&host.as_str()) {
        true
    } else if host == SHORT_HOST {
        parsed.path().trim_end_matches('/') == SHORT_PLAYLIST_PATH
    } else {
        return Err(invalid(trimmed, format!("unrecognized host '{}'", host)));
    };

    if !accepted {
        return Err(invalid(trimmed, "short link is not a playlist link"));
    }

    parsed
        .query_pairs()
        .find(|(name, _)| name == PLAYLIST_PARAM)
        .map(|(_, value)| value.trim().to_string())
        .filter(|id| !id.is_empty())
        .ok_or_else(|| invalid(trimmed, "missing 'list' parameter"))
}
