//! Transport-agnostic request/response shapes of the conversion endpoint

use bridge_traits::AccessCredential;
use core_convert::{ConversionFailure, ConversionReport, ErrorCategory, PartialProgress};
use serde::{Deserialize, Serialize};

use crate::error::ServiceError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionRequest {
    pub source_playlist_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_playlist_name: Option<String>,
}

/// Per-request identity supplied by the auth collaborator
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub user_credential: AccessCredential,
    pub owner_id: String,
    /// Credential dedicated to catalog searches, when the deployment has one
    pub search_credential: Option<AccessCredential>,
}

impl RequestContext {
    pub fn new(user_credential: AccessCredential, owner_id: impl Into<String>) -> Self {
        Self {
            user_credential,
            owner_id: owner_id.into(),
            search_credential: None,
        }
    }

    pub fn with_search_credential(mut self, credential: AccessCredential) -> Self {
        self.search_credential = Some(credential);
        self
    }
}

/// Body of a full or partial success
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionSummary {
    pub conversion_id: String,
    pub source_playlist_id: String,
    pub destination_playlist_id: String,
    pub destination_playlist_name: String,
    pub destination_playlist_url: String,
    pub total_source_tracks: usize,
    pub matched_count: usize,
    pub tracks_written: usize,
    pub unmatched_titles: Vec<String>,
    pub write_errors: Vec<String>,
}

impl From<ConversionReport> for ConversionSummary {
    fn from(report: ConversionReport) -> Self {
        Self {
            conversion_id: report.conversion_id.to_string(),
            source_playlist_id: report.source_playlist_id,
            destination_playlist_id: report.destination_playlist_id,
            destination_playlist_name: report.destination_playlist_name,
            destination_playlist_url: report.destination_playlist_url,
            total_source_tracks: report.total_source_tracks,
            matched_count: report.matched_count,
            tracks_written: report.tracks_written,
            unmatched_titles: report.unmatched_titles,
            write_errors: report.write_errors,
        }
    }
}

/// Body of an early termination: the kind plus whatever was computed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub kind: String,
    pub category: ErrorCategory,
    pub message: String,
    #[serde(flatten)]
    pub progress: PartialProgress,
}

impl From<ConversionFailure> for ErrorBody {
    fn from(failure: ConversionFailure) -> Self {
        Self {
            kind: failure.kind().as_str().to_string(),
            category: failure.error.category(),
            message: failure.error.to_string(),
            progress: failure.progress,
        }
    }
}

impl From<ServiceError> for ErrorBody {
    fn from(error: ServiceError) -> Self {
        Self {
            kind: error.kind().to_string(),
            category: error.category(),
            message: error.to_string(),
            progress: PartialProgress::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ConversionResponse {
    Completed(ConversionSummary),
    Failed(ErrorBody),
}

impl ConversionResponse {
    /// HTTP status a transport layer should use for this response.
    pub fn status_code(&self) -> u16 {
        match self {
            ConversionResponse::Completed(_) => 200,
            ConversionResponse::Failed(body) => match body.category {
                ErrorCategory::ReportedOutcome => 200,
                ErrorCategory::ClientInput => 400,
                ErrorCategory::NotFound => 404,
                ErrorCategory::Upstream => 502,
                ErrorCategory::Fatal => 500,
                ErrorCategory::Cancelled => 499,
            },
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, ConversionResponse::Completed(_))
    }
}
