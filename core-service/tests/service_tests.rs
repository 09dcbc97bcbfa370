//! Integration tests for the conversion service
//!
//! A scripted `HttpClient` stands in for both upstream APIs so these tests
//! cover the whole path: request validation, credential routing, connector
//! wiring, and response rendering.

use async_trait::async_trait;
use bridge_traits::error::Result as BridgeResult;
use bridge_traits::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use bytes::Bytes;
use core_service::{
    AccessCredential, CancellationToken, ConversionRequest, ConversionResponse,
    ConversionService, ConverterConfig, RequestContext, SearchCredentialPolicy,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

const YOUTUBE_BASE: &str = "https://yt.test/v3";
const SPOTIFY_BASE: &str = "https://sp.test/v1";
const PLAYLIST_URL: &str = "https://www.youtube.com/playlist?list=PLservice";

// ============================================================================
// Scripted HTTP client
// ============================================================================

#[derive(Debug, Clone)]
struct Recorded {
    method: HttpMethod,
    url: String,
    authorization: Option<String>,
    body: Option<serde_json::Value>,
}

struct ScriptedHttp {
    source_status: u16,
    source_body: serde_json::Value,
    /// Normalized search query → track URI
    hits: HashMap<String, String>,
    requests: Mutex<Vec<Recorded>>,
}

impl ScriptedHttp {
    fn new(titles: &[&str], hits: &[(&str, &str)]) -> Arc<Self> {
        let items: Vec<_> = titles
            .iter()
            .map(|title| serde_json::json!({ "snippet": { "title": title } }))
            .collect();

        Arc::new(Self {
            source_status: 200,
            source_body: serde_json::json!({ "items": items }),
            hits: hits
                .iter()
                .map(|(q, uri)| (q.to_string(), uri.to_string()))
                .collect(),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn failing_source(status: u16, body: serde_json::Value) -> Arc<Self> {
        Arc::new(Self {
            source_status: status,
            source_body: body,
            hits: HashMap::new(),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    fn spotify_requests(&self) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.url.starts_with(SPOTIFY_BASE))
            .collect()
    }

    fn search_response(&self, url: &str) -> serde_json::Value {
        let parsed = url::Url::parse(url).unwrap();
        let query = parsed
            .query_pairs()
            .find(|(key, _)| key == "q")
            .map(|(_, value)| value.into_owned())
            .unwrap_or_default();

        let items: Vec<_> = self
            .hits
            .get(&query)
            .map(|uri| serde_json::json!({ "uri": uri, "name": query, "artists": [] }))
            .into_iter()
            .collect();

        serde_json::json!({ "tracks": { "items": items } })
    }
}

fn respond(status: u16, body: serde_json::Value) -> HttpResponse {
    HttpResponse {
        status,
        headers: HashMap::new(),
        body: Bytes::from(body.to_string()),
    }
}

#[async_trait]
impl HttpClient for ScriptedHttp {
    async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse> {
        self.requests.lock().unwrap().push(Recorded {
            method: request.method,
            url: request.url.clone(),
            authorization: request.headers.get("Authorization").cloned(),
            body: request
                .body
                .as_ref()
                .and_then(|body| serde_json::from_slice(body).ok()),
        });

        let url = request.url.as_str();
        let response = if url.starts_with(YOUTUBE_BASE) {
            respond(self.source_status, self.source_body.clone())
        } else if url.starts_with(&format!("{}/search", SPOTIFY_BASE)) {
            respond(200, self.search_response(url))
        } else if url.starts_with(&format!("{}/users/", SPOTIFY_BASE)) {
            respond(
                201,
                serde_json::json!({
                    "id": "newpl",
                    "uri": "spotify:playlist:newpl",
                    "name": "ignored",
                    "external_urls": { "spotify": "https://open.spotify.com/playlist/newpl" }
                }),
            )
        } else if url.starts_with(&format!("{}/playlists/", SPOTIFY_BASE)) {
            respond(201, serde_json::json!({ "snapshot_id": "snap" }))
        } else {
            respond(404, serde_json::json!({}))
        };

        Ok(response)
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn service(http: Arc<ScriptedHttp>, policy: SearchCredentialPolicy) -> ConversionService {
    let config = ConverterConfig::builder()
        .http_client(http)
        .youtube_api_key("yt-key")
        .youtube_api_base(YOUTUBE_BASE)
        .spotify_api_base(SPOTIFY_BASE)
        .search_credential_policy(policy)
        .build()
        .unwrap();
    ConversionService::new(config).unwrap()
}

fn request(name: Option<&str>) -> ConversionRequest {
    ConversionRequest {
        source_playlist_url: PLAYLIST_URL.to_string(),
        destination_playlist_name: name.map(str::to_string),
    }
}

fn user_context() -> RequestContext {
    RequestContext::new(AccessCredential::new("user-token"), "owner42")
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_partial_success_renders_summary() {
    let http = ScriptedHttp::new(&["Song A", "Song B"], &[("song a", "spotify:track:a")]);
    let service = service(http.clone(), SearchCredentialPolicy::FallbackToUser);

    let response = service
        .convert(request(Some("Mix")), user_context(), &CancellationToken::new())
        .await;

    assert_eq!(response.status_code(), 200);
    let ConversionResponse::Completed(summary) = response else {
        panic!("expected completed response, got {:?}", response);
    };
    assert_eq!(summary.source_playlist_id, "PLservice");
    assert_eq!(summary.destination_playlist_id, "newpl");
    assert_eq!(
        summary.destination_playlist_url,
        "https://open.spotify.com/playlist/newpl"
    );
    assert_eq!(summary.total_source_tracks, 2);
    assert_eq!(summary.matched_count, 1);
    assert_eq!(summary.tracks_written, 1);
    assert_eq!(summary.unmatched_titles, vec!["Song B"]);
    assert!(summary.write_errors.is_empty());

    let requests = http.requests();
    assert!(requests[0].url.contains("playlistId=PLservice"));
    assert!(requests[0].url.contains("key=yt-key"));

    let create = requests
        .iter()
        .find(|r| r.url == format!("{}/users/owner42/playlists", SPOTIFY_BASE))
        .unwrap();
    assert_eq!(create.method, HttpMethod::Post);
    assert_eq!(create.body.as_ref().unwrap()["name"], "Mix");
    assert_eq!(create.body.as_ref().unwrap()["public"], false);

    let add = requests
        .iter()
        .find(|r| r.url == format!("{}/playlists/newpl/tracks", SPOTIFY_BASE))
        .unwrap();
    assert_eq!(
        add.body.as_ref().unwrap()["uris"],
        serde_json::json!(["spotify:track:a"])
    );

    assert!(http
        .spotify_requests()
        .iter()
        .all(|r| r.authorization.as_deref() == Some("Bearer user-token")));
}

#[tokio::test]
async fn test_summary_serializes_camel_case() {
    let http = ScriptedHttp::new(&["Song A"], &[("song a", "spotify:track:a")]);
    let service = service(http, SearchCredentialPolicy::FallbackToUser);

    let response = service
        .convert(request(None), user_context(), &CancellationToken::new())
        .await;

    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["status"], "completed");
    assert_eq!(json["destinationPlaylistId"], "newpl");
    assert_eq!(json["tracksWritten"], 1);
    assert_eq!(json["unmatchedTitles"], serde_json::json!([]));
    assert_eq!(json["writeErrors"], serde_json::json!([]));
}

#[tokio::test]
async fn test_blank_name_falls_back_to_default() {
    let http = ScriptedHttp::new(&["Song A"], &[("song a", "spotify:track:a")]);
    let service = service(http.clone(), SearchCredentialPolicy::FallbackToUser);

    service
        .convert(request(Some("   ")), user_context(), &CancellationToken::new())
        .await;

    let create = http
        .requests()
        .into_iter()
        .find(|r| r.url.ends_with("/playlists") && r.url.contains("/users/"))
        .unwrap();
    assert_eq!(
        create.body.unwrap()["name"],
        "Converted YouTube Playlist"
    );
}

#[tokio::test]
async fn test_dedicated_search_credential_is_used_for_searches_only() {
    let http = ScriptedHttp::new(&["Song A"], &[("song a", "spotify:track:a")]);
    let service = service(http.clone(), SearchCredentialPolicy::FallbackToUser);
    let context = user_context().with_search_credential(AccessCredential::new("search-token"));

    let response = service
        .convert(request(None), context, &CancellationToken::new())
        .await;
    assert!(response.is_completed());

    for recorded in http.spotify_requests() {
        let expected = if recorded.url.contains("/search?") {
            "Bearer search-token"
        } else {
            "Bearer user-token"
        };
        assert_eq!(recorded.authorization.as_deref(), Some(expected), "{}", recorded.url);
    }
}

#[tokio::test]
async fn test_required_search_credential_missing_is_client_error() {
    let http = ScriptedHttp::new(&["Song A"], &[]);
    let service = service(http.clone(), SearchCredentialPolicy::RequireDedicated);

    let response = service
        .convert(request(None), user_context(), &CancellationToken::new())
        .await;

    assert_eq!(response.status_code(), 400);
    let ConversionResponse::Failed(body) = response else {
        panic!("expected failure");
    };
    assert_eq!(body.kind, "search_credential_unavailable");
    assert!(http.requests().is_empty());
}

#[tokio::test]
async fn test_blank_owner_is_rejected_before_network() {
    let http = ScriptedHttp::new(&["Song A"], &[]);
    let service = service(http.clone(), SearchCredentialPolicy::FallbackToUser);

    let response = service
        .convert(
            request(None),
            RequestContext::new(AccessCredential::new("user-token"), " "),
            &CancellationToken::new(),
        )
        .await;

    assert_eq!(response.status_code(), 400);
    assert!(http.requests().is_empty());
}

#[tokio::test]
async fn test_invalid_url_is_client_error() {
    let http = ScriptedHttp::new(&["Song A"], &[]);
    let service = service(http.clone(), SearchCredentialPolicy::FallbackToUser);

    let response = service
        .convert(
            ConversionRequest {
                source_playlist_url: "https://vimeo.com/showcase/1".to_string(),
                destination_playlist_name: None,
            },
            user_context(),
            &CancellationToken::new(),
        )
        .await;

    assert_eq!(response.status_code(), 400);
    let ConversionResponse::Failed(body) = response else {
        panic!("expected failure");
    };
    assert_eq!(body.kind, "invalid_playlist_url");
    assert!(http.requests().is_empty());
}

#[tokio::test]
async fn test_missing_source_playlist_is_not_found() {
    let http = ScriptedHttp::failing_source(
        404,
        serde_json::json!({
            "error": {
                "code": 404,
                "message": "The playlist identified with the request's playlistId parameter cannot be found.",
                "errors": [{ "reason": "playlistNotFound", "message": "not found" }]
            }
        }),
    );
    let service = service(http.clone(), SearchCredentialPolicy::FallbackToUser);

    let response = service
        .convert(request(None), user_context(), &CancellationToken::new())
        .await;

    assert_eq!(response.status_code(), 404);
    let ConversionResponse::Failed(body) = response else {
        panic!("expected failure");
    };
    assert_eq!(body.kind, "playlist_not_found_or_private");
    assert!(http.spotify_requests().is_empty());
}

#[tokio::test]
async fn test_quota_exhaustion_is_upstream_error() {
    let http = ScriptedHttp::failing_source(
        403,
        serde_json::json!({
            "error": {
                "code": 403,
                "message": "quota",
                "errors": [{ "reason": "quotaExceeded", "message": "quota" }]
            }
        }),
    );
    let service = service(http, SearchCredentialPolicy::FallbackToUser);

    let response = service
        .convert(request(None), user_context(), &CancellationToken::new())
        .await;

    assert_eq!(response.status_code(), 502);
    let ConversionResponse::Failed(body) = response else {
        panic!("expected failure");
    };
    assert_eq!(body.kind, "quota_exceeded");
    assert!(body.message.contains("quotaExceeded"));
}

#[tokio::test]
async fn test_no_matches_is_reported_with_success_status() {
    let http = ScriptedHttp::new(&["Unknown One", "Unknown Two"], &[]);
    let service = service(http.clone(), SearchCredentialPolicy::FallbackToUser);

    let response = service
        .convert(request(None), user_context(), &CancellationToken::new())
        .await;

    assert_eq!(response.status_code(), 200);
    let ConversionResponse::Failed(body) = response else {
        panic!("expected reported outcome");
    };
    assert_eq!(body.kind, "no_matches_found");
    assert_eq!(body.progress.total_source_tracks, Some(2));
    assert_eq!(
        body.progress.unmatched_titles,
        vec!["Unknown One", "Unknown Two"]
    );
    assert!(!http
        .spotify_requests()
        .iter()
        .any(|r| r.method == HttpMethod::Post));
}
