//! Multi-strategy track matching against the destination catalog
//!
//! Each track is searched with up to three queries in fixed priority order
//! and the first hit wins. Tracks are matched concurrently on a
//! semaphore-bounded task pool so the whole batch stays inside the
//! destination's shared rate limit.

use bridge_traits::DestinationCatalog;
use core_async::sync::{acquire_unless_cancelled, CancellationToken, Semaphore};
use core_async::task;
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

use crate::error::{ConversionError, Result, Stage};
use crate::normalizer::{normalize_artist_hint, normalize_title};
use crate::types::{MatchOutcome, SearchAttempt, SourceTrack, StrategyLabel};

/// Upper bound on in-flight searches, whatever the caller asks for
pub const MAX_CONCURRENCY: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchSettings {
    pub concurrency: usize,
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self { concurrency: 5 }
    }
}

impl MatchSettings {
    fn effective_concurrency(&self) -> usize {
        self.concurrency.clamp(1, MAX_CONCURRENCY)
    }
}

fn strip_quotes(term: &str) -> String {
    term.replace('"', "")
}

/// Build the ordered search attempts for a normalized title and hint.
///
/// An empty title yields no attempts. Without an artist hint only the
/// title-only attempt is generated.
pub fn build_attempts(title: &str, artist: Option<&str>) -> Vec<SearchAttempt> {
    if title.is_empty() {
        return Vec::new();
    }

    let mut attempts = Vec::with_capacity(3);

    if let Some(artist) = artist.filter(|a| !a.is_empty()) {
        attempts.push(SearchAttempt {
            query: format!(
                "track:\"{}\" artist:\"{}\"",
                strip_quotes(title),
                strip_quotes(artist)
            ),
            strategy: StrategyLabel::Precise,
        });
        attempts.push(SearchAttempt {
            query: format!("{} {}", title, artist),
            strategy: StrategyLabel::Combined,
        });
    }

    attempts.push(SearchAttempt {
        query: title.to_string(),
        strategy: StrategyLabel::TitleOnly,
    });

    attempts
}

/// Matches source tracks against a search-capable destination catalog.
#[derive(Clone)]
pub struct CatalogMatcher {
    catalog: Arc<dyn DestinationCatalog>,
}

impl CatalogMatcher {
    pub fn new(catalog: Arc<dyn DestinationCatalog>) -> Self {
        Self { catalog }
    }

    /// Match one track. Never fails: exhausting every strategy, or being
    /// rate limited, is a not-found outcome.
    pub async fn match_track(&self, track: &SourceTrack) -> MatchOutcome {
        let title = normalize_title(&track.title);
        if title.is_empty() {
            debug!(raw_title = %track.title, "Title normalized to nothing, skipping search");
            return MatchOutcome::not_found(track.clone());
        }

        let artist = normalize_artist_hint(track.artist_hint.as_deref());

        for attempt in build_attempts(&title, artist.as_deref()) {
            match self.catalog.search_track(&attempt.query).await {
                Ok(Some(hit)) => {
                    debug!(strategy = ?attempt.strategy, uri = %hit.uri, "Matched track");
                    return MatchOutcome::matched(track.clone(), hit.uri, attempt.strategy);
                }
                Ok(None) => {
                    debug!(strategy = ?attempt.strategy, "No hit, trying next strategy");
                }
                Err(e) if e.is_rate_limited() => {
                    warn!(
                        strategy = ?attempt.strategy,
                        error = %e,
                        "Rate limited, abandoning remaining strategies for this track"
                    );
                    break;
                }
                Err(e) => {
                    warn!(strategy = ?attempt.strategy, error = %e, "Search failed, trying next strategy");
                }
            }
        }

        MatchOutcome::not_found(track.clone())
    }

    /// Match every track with at most `settings.concurrency` searches in
    /// flight. Outcomes come back in source order.
    #[instrument(skip(self, tracks, cancel), fields(tracks = tracks.len(), concurrency = settings.concurrency))]
    pub async fn match_all(
        &self,
        tracks: &[SourceTrack],
        settings: MatchSettings,
        cancel: &CancellationToken,
    ) -> Result<Vec<MatchOutcome>> {
        let semaphore = Arc::new(Semaphore::new(settings.effective_concurrency()));
        let mut handles = Vec::with_capacity(tracks.len());

        for track in tracks {
            if cancel.is_cancelled() {
                return Err(abort_all(handles));
            }

            let Some(permit) = acquire_unless_cancelled(semaphore.clone(), cancel).await else {
                return Err(abort_all(handles));
            };

            let matcher = self.clone();
            let track = track.clone();
            handles.push(task::spawn(async move {
                let outcome = matcher.match_track(&track).await;
                drop(permit);
                outcome
            }));
        }

        let outcomes: Vec<MatchOutcome> = join_all(handles)
            .await
            .into_iter()
            .zip(tracks)
            .map(|(joined, track)| {
                joined.unwrap_or_else(|e| {
                    error!(error = %e, title = %track.title, "Match task panicked");
                    MatchOutcome::not_found(track.clone())
                })
            })
            .collect();

        let matched = outcomes.iter().filter(|o| o.is_matched()).count();
        info!(matched, unmatched = outcomes.len() - matched, "Matching finished");

        Ok(outcomes)
    }
}

fn abort_all(handles: Vec<task::JoinHandle<MatchOutcome>>) -> ConversionError {
    for handle in &handles {
        handle.abort();
    }
    ConversionError::Cancelled {
        stage: Stage::Match,
    }
}
