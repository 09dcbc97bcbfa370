//! # Conversion Pipeline
//!
//! Converts a source video playlist into a destination music playlist.
//!
//! ## Overview
//!
//! A conversion runs five stages in order and stops at the first fatal one:
//! - Extract the playlist id from a shareable URL
//! - Fetch every available source track through the `SourceCatalog`
//! - Match each track against the `DestinationCatalog` with a bounded
//!   number of concurrent searches
//! - Create the destination playlist and write matched tracks in chunks
//! - Report totals, unmatched titles and write errors
//!
//! ## Components
//!
//! - **Playlist Id** (`playlist_id`): URL parsing and host validation
//! - **Normalizer** (`normalizer`): Title and artist-hint cleanup
//! - **Fetcher** (`fetcher`): Cursor pagination over the source catalog
//! - **Matcher** (`matcher`): Ordered search strategies per track
//! - **Writer** (`writer`): Playlist creation and chunked writes
//! - **Orchestrator** (`orchestrator`): Stage sequencing and reporting

pub mod error;
pub mod fetcher;
pub mod matcher;
pub mod normalizer;
pub mod orchestrator;
pub mod playlist_id;
pub mod types;
pub mod writer;

pub use error::{
    ConversionError, ConversionFailure, ErrorCategory, ErrorKind, PartialProgress, Result, Stage,
};
pub use fetcher::SourceTrackFetcher;
pub use matcher::{build_attempts, CatalogMatcher, MatchSettings};
pub use normalizer::{normalize_artist_hint, normalize_title};
pub use orchestrator::{Catalogs, ConversionInput, ConversionOrchestrator, PipelineSettings};
pub use playlist_id::extract_playlist_id;
pub use types::{
    BatchWriteResult, ConversionReport, MatchOutcome, SearchAttempt, SourceTrack, StrategyCounts,
    StrategyLabel,
};
pub use writer::{PlaylistWriter, WriteCancelled, WriteSettings};
