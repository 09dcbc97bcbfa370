//! Source playlist retrieval
//!
//! Pages through the source catalog sequentially (each request needs the
//! previous page's cursor) and drops unavailable entries at ingestion.

use bridge_traits::SourceCatalog;
use core_async::sync::CancellationToken;
use tracing::{debug, info, instrument};

use crate::error::{ConversionError, Result, Stage};
use crate::types::SourceTrack;

/// Titles the source catalog uses for entries whose video is gone.
/// Compared case-insensitively after trimming.
const UNAVAILABLE_TITLES: &[&str] = &["deleted video", "private video"];

fn is_unavailable(title: &str) -> bool {
    let title = title.trim();
    UNAVAILABLE_TITLES
        .iter()
        .any(|sentinel| title.eq_ignore_ascii_case(sentinel))
}

pub struct SourceTrackFetcher<'a> {
    catalog: &'a dyn SourceCatalog,
    page_size: u32,
}

impl<'a> SourceTrackFetcher<'a> {
    pub fn new(catalog: &'a dyn SourceCatalog, page_size: u32) -> Self {
        Self { catalog, page_size }
    }

    /// Fetch every available track of `playlist_id`, in playlist order.
    #[instrument(skip(self, cancel), fields(page_size = self.page_size))]
    pub async fn fetch_all(
        &self,
        playlist_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<SourceTrack>> {
        let mut tracks = Vec::new();
        let mut dropped = 0usize;
        let mut cursor: Option<String> = None;
        let mut page_count = 0u32;

        loop {
            if cancel.is_cancelled() {
                return Err(ConversionError::Cancelled {
                    stage: Stage::Fetch,
                });
            }

            page_count += 1;
            debug!(page = page_count, cursor = ?cursor, "Fetching source page");

            let page = self
                .catalog
                .list_playlist_items(playlist_id, cursor.as_deref(), self.page_size)
                .await
                .map_err(|e| ConversionError::from_fetch(playlist_id, e))?;

            for item in page.items {
                if is_unavailable(&item.title) {
                    dropped += 1;
                    continue;
                }
                tracks.push(SourceTrack::new(item.title, item.artist_hint));
            }

            cursor = page.next_cursor;
            if cursor.is_none() {
                break;
            }
        }

        info!(
            tracks = tracks.len(),
            dropped,
            pages = page_count,
            "Fetched source playlist"
        );

        Ok(tracks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::catalog::Result as CatalogResult;
    use bridge_traits::{CatalogError, SourceItem, SourcePage};
    use std::sync::Mutex;

    /// Serves scripted pages keyed by cursor and records each request.
    struct PagedCatalog {
        pages: Vec<CatalogResult<SourcePage>>,
        requests: Mutex<Vec<(Option<String>, u32)>>,
    }

    impl PagedCatalog {
        fn new(pages: Vec<CatalogResult<SourcePage>>) -> Self {
            Self {
                pages,
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl SourceCatalog for PagedCatalog {
        async fn list_playlist_items(
            &self,
            _playlist_id: &str,
            page_cursor: Option<&str>,
            page_size: u32,
        ) -> CatalogResult<SourcePage> {
            let mut requests = self.requests.lock().unwrap();
            let index = requests.len();
            requests.push((page_cursor.map(str::to_string), page_size));
            self.pages[index].clone()
        }
    }

    fn item(title: &str) -> SourceItem {
        SourceItem::new(title, Some("Channel".to_string()))
    }

    #[tokio::test]
    async fn test_follows_cursor_until_exhausted() {
        let catalog = PagedCatalog::new(vec![
            Ok(SourcePage {
                items: vec![item("One"), item("Two")],
                next_cursor: Some("p2".to_string()),
            }),
            Ok(SourcePage {
                items: vec![item("Three")],
                next_cursor: None,
            }),
        ]);

        let tracks = SourceTrackFetcher::new(&catalog, 50)
            .fetch_all("PL1", &CancellationToken::new())
            .await
            .unwrap();

        let titles: Vec<_> = tracks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["One", "Two", "Three"]);

        let requests = catalog.requests.lock().unwrap();
        assert_eq!(
            *requests,
            vec![(None, 50), (Some("p2".to_string()), 50)]
        );
    }

    #[tokio::test]
    async fn test_drops_unavailable_sentinels() {
        let catalog = PagedCatalog::new(vec![Ok(SourcePage {
            items: vec![
                item("Deleted video"),
                item("  PRIVATE VIDEO "),
                item("Kept"),
                item("Deleted video (remix)"),
            ],
            next_cursor: None,
        })]);

        let tracks = SourceTrackFetcher::new(&catalog, 50)
            .fetch_all("PL1", &CancellationToken::new())
            .await
            .unwrap();

        let titles: Vec<_> = tracks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["Kept", "Deleted video (remix)"]);
    }

    #[tokio::test]
    async fn test_failure_on_later_page_is_classified() {
        let catalog = PagedCatalog::new(vec![
            Ok(SourcePage {
                items: vec![item("One")],
                next_cursor: Some("p2".to_string()),
            }),
            Err(CatalogError::ItemsNotAccessible {
                reason: "playlistItemsNotAccessible".to_string(),
            }),
        ]);

        let error = SourceTrackFetcher::new(&catalog, 50)
            .fetch_all("PL1", &CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(
            error,
            ConversionError::ItemsNotAccessible {
                reason: "playlistItemsNotAccessible".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_cancelled_before_first_page() {
        let catalog = PagedCatalog::new(vec![]);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let error = SourceTrackFetcher::new(&catalog, 50)
            .fetch_all("PL1", &cancel)
            .await
            .unwrap_err();

        assert_eq!(
            error,
            ConversionError::Cancelled {
                stage: Stage::Fetch
            }
        );
        assert!(catalog.requests.lock().unwrap().is_empty());
    }
}
