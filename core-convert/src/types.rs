//! Pipeline data model
//!
//! Everything here lives for a single conversion and is never persisted.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// A playlist entry that survived ingestion filtering
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceTrack {
    /// Raw title as the source catalog returned it
    pub title: String,
    pub artist_hint: Option<String>,
}

impl SourceTrack {
    pub fn new(title: impl Into<String>, artist_hint: Option<String>) -> Self {
        Self {
            title: title.into(),
            artist_hint,
        }
    }
}

/// Search strategy, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyLabel {
    /// Field-scoped title and artist
    Precise,
    /// Free-text title and artist
    Combined,
    TitleOnly,
}

/// One query to try against the destination catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchAttempt {
    pub query: String,
    pub strategy: StrategyLabel,
}

/// Result of matching one source track
///
/// `destination_uri == None` is a normal outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchOutcome {
    pub source_track: SourceTrack,
    pub destination_uri: Option<String>,
    /// Strategy that produced the hit
    pub strategy: Option<StrategyLabel>,
}

impl MatchOutcome {
    pub fn matched(source_track: SourceTrack, uri: String, strategy: StrategyLabel) -> Self {
        Self {
            source_track,
            destination_uri: Some(uri),
            strategy: Some(strategy),
        }
    }

    pub fn not_found(source_track: SourceTrack) -> Self {
        Self {
            source_track,
            destination_uri: None,
            strategy: None,
        }
    }

    pub fn is_matched(&self) -> bool {
        self.destination_uri.is_some()
    }
}

/// Outcome of writing one chunk, or the aggregate over all chunks
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchWriteResult {
    pub attempted_count: usize,
    pub succeeded_count: usize,
    pub failure_messages: Vec<String>,
}

impl BatchWriteResult {
    /// Fold another chunk result into this aggregate
    pub fn absorb(&mut self, chunk: BatchWriteResult) {
        self.attempted_count += chunk.attempted_count;
        self.succeeded_count += chunk.succeeded_count;
        self.failure_messages.extend(chunk.failure_messages);
    }
}

/// Hits per winning strategy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyCounts {
    pub precise: usize,
    pub combined: usize,
    pub title_only: usize,
}

impl StrategyCounts {
    pub fn record(&mut self, strategy: StrategyLabel) {
        match strategy {
            StrategyLabel::Precise => self.precise += 1,
            StrategyLabel::Combined => self.combined += 1,
            StrategyLabel::TitleOnly => self.title_only += 1,
        }
    }
}

/// Final report of a conversion that reached the write stage
///
/// Invariants: `matched_count + unmatched_titles.len() == total_source_tracks`
/// and `tracks_written <= matched_count`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionReport {
    pub conversion_id: Uuid,
    pub source_playlist_id: String,
    pub destination_playlist_id: String,
    pub destination_playlist_uri: String,
    pub destination_playlist_name: String,
    pub destination_playlist_url: String,
    pub total_source_tracks: usize,
    pub matched_count: usize,
    /// Original titles, in source order
    pub unmatched_titles: Vec<String>,
    /// Tracks whose title normalized to nothing and were never searched
    pub unsearchable_count: usize,
    pub matches_by_strategy: StrategyCounts,
    pub tracks_written: usize,
    pub write_errors: Vec<String>,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

impl ConversionReport {
    pub fn is_complete(&self) -> bool {
        self.write_errors.is_empty() && self.tracks_written == self.matched_count
    }
}
