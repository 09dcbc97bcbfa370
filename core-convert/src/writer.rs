//! Destination playlist creation and batched track writes

use bridge_traits::{CreatedPlaylist, DestinationCatalog};
use core_async::sync::CancellationToken;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::error::{ConversionError, Result};
use crate::types::BatchWriteResult;

/// Largest number of URIs the destination accepts in one write
pub const MAX_CHUNK_SIZE: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteSettings {
    pub chunk_size: usize,
    pub public: bool,
}

impl Default for WriteSettings {
    fn default() -> Self {
        Self {
            chunk_size: MAX_CHUNK_SIZE,
            public: false,
        }
    }
}

/// Cancellation observed between chunks; carries what was written so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteCancelled {
    pub partial: BatchWriteResult,
}

pub struct PlaylistWriter {
    catalog: Arc<dyn DestinationCatalog>,
    settings: WriteSettings,
}

impl PlaylistWriter {
    pub fn new(catalog: Arc<dyn DestinationCatalog>, settings: WriteSettings) -> Self {
        Self { catalog, settings }
    }

    fn chunk_size(&self) -> usize {
        self.settings.chunk_size.clamp(1, MAX_CHUNK_SIZE)
    }

    /// Create the destination playlist. Any failure is fatal to the conversion.
    #[instrument(skip(self))]
    pub async fn create_playlist(&self, owner_id: &str, name: &str) -> Result<CreatedPlaylist> {
        self.catalog
            .create_playlist(owner_id, name, self.settings.public)
            .await
            .map_err(|e| {
                warn!(error = %e, "Destination playlist creation failed");
                ConversionError::from_create(e)
            })
    }

    /// Append `uris` in sequential chunks. A failed chunk is recorded and
    /// the remaining chunks are still attempted.
    #[instrument(skip(self, uris, cancel), fields(uris = uris.len()))]
    pub async fn add_tracks(
        &self,
        playlist_id: &str,
        uris: &[String],
        cancel: &CancellationToken,
    ) -> std::result::Result<BatchWriteResult, WriteCancelled> {
        let mut total = BatchWriteResult::default();
        if uris.is_empty() {
            return Ok(total);
        }

        let chunks: Vec<&[String]> = uris.chunks(self.chunk_size()).collect();
        let chunk_count = chunks.len();

        for (index, chunk) in chunks.into_iter().enumerate() {
            if cancel.is_cancelled() {
                warn!(
                    written = total.succeeded_count,
                    remaining_chunks = chunk_count - index,
                    "Write cancelled"
                );
                return Err(WriteCancelled { partial: total });
            }

            let result = match self.catalog.add_tracks_to_playlist(playlist_id, chunk).await {
                Ok(()) => BatchWriteResult {
                    attempted_count: chunk.len(),
                    succeeded_count: chunk.len(),
                    failure_messages: Vec::new(),
                },
                Err(e) => {
                    warn!(chunk = index + 1, chunk_count, error = %e, "Chunk write failed");
                    BatchWriteResult {
                        attempted_count: chunk.len(),
                        succeeded_count: 0,
                        failure_messages: vec![format!(
                            "Chunk {}/{} ({} tracks) failed: {}",
                            index + 1,
                            chunk_count,
                            chunk.len(),
                            e
                        )],
                    }
                }
            };

            total.absorb(result);
        }

        info!(
            attempted = total.attempted_count,
            written = total.succeeded_count,
            failed_chunks = total.failure_messages.len(),
            "Tracks written"
        );

        Ok(total)
    }
}
