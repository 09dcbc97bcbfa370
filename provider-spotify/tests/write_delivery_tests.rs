//! Delivery guarantees for playlist writes over a real transport

use bridge_desktop::ReqwestHttpClient;
use bridge_traits::{AccessCredential, DestinationCatalog};
use core_runtime::RateLimitConfig;
use provider_spotify::SpotifyConnector;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::net::TcpListener;

/// Accepts connections, reads the request, and hangs up without answering.
async fn dropping_server() -> (String, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    let received = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&received);
    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            counter.fetch_add(1, Ordering::SeqCst);
            let mut buffer = vec![0u8; 8192];
            let _ = socket.read(&mut buffer).await;
            drop(socket);
        }
    });

    (format!("http://{}/v1", address), received)
}

fn connector(base_url: String) -> SpotifyConnector {
    let http = ReqwestHttpClient::with_timeout(Duration::from_secs(2)).unwrap();
    SpotifyConnector::new(
        Arc::new(http),
        AccessCredential::new("user-token"),
        base_url,
        RateLimitConfig {
            max_retries: 2,
            base_delay_ms: 1,
            max_delay_ms: 2,
        },
    )
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_lost_add_tracks_response_is_sent_once() {
    let (base_url, received) = dropping_server().await;
    let uris = vec!["spotify:track:1".to_string()];

    let result = connector(base_url).add_tracks_to_playlist("pl1", &uris).await;

    assert!(result.is_err());
    assert_eq!(received.load(Ordering::SeqCst), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_lost_create_playlist_response_is_sent_once() {
    let (base_url, received) = dropping_server().await;

    let result = connector(base_url).create_playlist("owner", "Mix", false).await;

    assert!(result.is_err());
    assert_eq!(received.load(Ordering::SeqCst), 1);
}
