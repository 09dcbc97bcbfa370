//! Staged conversion pipeline
//!
//! Extract → Fetch → Match → Create+Write → Report. Every early exit is a
//! named [`ConversionError`] wrapped in a [`ConversionFailure`] that keeps
//! the counts computed up to that point.

use bridge_traits::{DestinationCatalog, SourceCatalog};
use chrono::Utc;
use core_async::sync::CancellationToken;
use core_runtime::ConverterConfig;
use std::sync::Arc;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::error::{ConversionError, ConversionFailure, PartialProgress, Stage};
use crate::fetcher::SourceTrackFetcher;
use crate::matcher::{CatalogMatcher, MatchSettings};
use crate::normalizer::normalize_title;
use crate::playlist_id::extract_playlist_id;
use crate::types::{ConversionReport, MatchOutcome, StrategyCounts};
use crate::writer::{PlaylistWriter, WriteSettings};

/// Tunables for one pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineSettings {
    pub fetch_page_size: u32,
    pub matching: MatchSettings,
    pub writing: WriteSettings,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            fetch_page_size: 50,
            matching: MatchSettings::default(),
            writing: WriteSettings::default(),
        }
    }
}

impl From<&ConverterConfig> for PipelineSettings {
    fn from(config: &ConverterConfig) -> Self {
        Self {
            fetch_page_size: config.fetch_page_size,
            matching: MatchSettings {
                concurrency: config.match_concurrency,
            },
            writing: WriteSettings {
                chunk_size: config.write_chunk_size,
                public: config.playlist_public,
            },
        }
    }
}

/// Request-scoped catalog clients.
///
/// `search` and `destination` may be the same client; they differ when
/// searches run under a dedicated credential.
#[derive(Clone)]
pub struct Catalogs {
    pub source: Arc<dyn SourceCatalog>,
    pub search: Arc<dyn DestinationCatalog>,
    pub destination: Arc<dyn DestinationCatalog>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionInput {
    pub source_playlist_url: String,
    pub owner_id: String,
    pub playlist_name: String,
}

/// Matched URIs and unmatched titles, both in source order
struct Partition {
    uris: Vec<String>,
    unmatched_titles: Vec<String>,
    unsearchable_count: usize,
    by_strategy: StrategyCounts,
}

fn partition(outcomes: Vec<MatchOutcome>) -> Partition {
    let mut partition = Partition {
        uris: Vec::new(),
        unmatched_titles: Vec::new(),
        unsearchable_count: 0,
        by_strategy: StrategyCounts::default(),
    };

    for outcome in outcomes {
        match (outcome.destination_uri, outcome.strategy) {
            (Some(uri), strategy) => {
                if let Some(strategy) = strategy {
                    partition.by_strategy.record(strategy);
                }
                partition.uris.push(uri);
            }
            (None, _) => {
                if normalize_title(&outcome.source_track.title).is_empty() {
                    partition.unsearchable_count += 1;
                }
                partition.unmatched_titles.push(outcome.source_track.title);
            }
        }
    }

    partition
}

pub struct ConversionOrchestrator {
    catalogs: Catalogs,
    settings: PipelineSettings,
}

impl ConversionOrchestrator {
    pub fn new(catalogs: Catalogs, settings: PipelineSettings) -> Self {
        Self { catalogs, settings }
    }

    /// Run a conversion end to end.
    pub async fn run(
        &self,
        input: &ConversionInput,
        cancel: &CancellationToken,
    ) -> Result<ConversionReport, ConversionFailure> {
        let conversion_id = Uuid::new_v4();
        let span = info_span!("conversion", %conversion_id);

        self.run_stages(conversion_id, input, cancel)
            .instrument(span)
            .await
            .map_err(|failure| {
                warn!(
                    %conversion_id,
                    kind = failure.kind().as_str(),
                    error = %failure.error,
                    "Conversion stopped early"
                );
                failure
            })
    }

    async fn run_stages(
        &self,
        conversion_id: Uuid,
        input: &ConversionInput,
        cancel: &CancellationToken,
    ) -> Result<ConversionReport, ConversionFailure> {
        let started_at = Utc::now();

        // Extract
        let playlist_id = extract_playlist_id(&input.source_playlist_url)?;
        info!(%playlist_id, "Extracted source playlist id");

        // Fetch
        let fetcher = SourceTrackFetcher::new(
            self.catalogs.source.as_ref(),
            self.settings.fetch_page_size,
        );
        let tracks = fetcher.fetch_all(&playlist_id, cancel).await?;
        let total_source_tracks = tracks.len();

        if tracks.is_empty() {
            return Err(ConversionFailure::new(
                ConversionError::EmptySourcePlaylist {
                    playlist_id: playlist_id.clone(),
                },
                PartialProgress {
                    total_source_tracks: Some(0),
                    ..Default::default()
                },
            ));
        }

        // Match
        let matcher = CatalogMatcher::new(Arc::clone(&self.catalogs.search));
        let outcomes = matcher
            .match_all(&tracks, self.settings.matching, cancel)
            .await
            .map_err(|error| {
                ConversionFailure::new(
                    error,
                    PartialProgress {
                        total_source_tracks: Some(total_source_tracks),
                        ..Default::default()
                    },
                )
            })?;

        let Partition {
            uris,
            unmatched_titles,
            unsearchable_count,
            by_strategy,
        } = partition(outcomes);
        let matched_count = uris.len();

        let progress = PartialProgress {
            total_source_tracks: Some(total_source_tracks),
            matched_count: Some(matched_count),
            unmatched_titles: unmatched_titles.clone(),
            destination_playlist_id: None,
            tracks_written: None,
        };

        if matched_count == 0 {
            return Err(ConversionFailure::new(
                ConversionError::NoMatchesFound {
                    total_source_tracks,
                    unmatched_titles,
                },
                progress,
            ));
        }

        // Create + write
        let writer = PlaylistWriter::new(
            Arc::clone(&self.catalogs.destination),
            self.settings.writing,
        );
        let playlist = writer
            .create_playlist(&input.owner_id, &input.playlist_name)
            .await
            .map_err(|error| ConversionFailure::new(error, progress.clone()))?;

        let written = writer
            .add_tracks(&playlist.id, &uris, cancel)
            .await
            .map_err(|cancelled| {
                ConversionFailure::new(
                    ConversionError::Cancelled {
                        stage: Stage::Write,
                    },
                    PartialProgress {
                        destination_playlist_id: Some(playlist.id.clone()),
                        tracks_written: Some(cancelled.partial.succeeded_count),
                        ..progress.clone()
                    },
                )
            })?;

        // Report
        let report = ConversionReport {
            conversion_id,
            source_playlist_id: playlist_id,
            destination_playlist_id: playlist.id,
            destination_playlist_uri: playlist.uri,
            destination_playlist_name: playlist.name,
            destination_playlist_url: playlist.external_url,
            total_source_tracks,
            matched_count,
            unmatched_titles,
            unsearchable_count,
            matches_by_strategy: by_strategy,
            tracks_written: written.succeeded_count,
            write_errors: written.failure_messages,
            started_at,
            completed_at: Utc::now(),
        };

        if report.is_complete() {
            info!(
                total = report.total_source_tracks,
                matched = report.matched_count,
                written = report.tracks_written,
                "Conversion finished"
            );
        } else {
            warn!(
                total = report.total_source_tracks,
                matched = report.matched_count,
                written = report.tracks_written,
                write_errors = report.write_errors.len(),
                "Conversion finished with unwritten matches"
            );
        }

        Ok(report)
    }
}
