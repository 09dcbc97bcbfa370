//! # YouTube Provider
//!
//! Implements `SourceCatalog` for the YouTube Data API v3.
//!
//! ## Overview
//!
//! This module provides:
//! - Paged `playlistItems.list` calls authenticated with an API key
//! - Mapping of items to titles plus the uploading channel as artist hint
//! - Classification of API errors (missing playlist, quota, private items)

pub mod connector;
pub mod error;
pub mod types;

pub use connector::YouTubeConnector;
pub use error::{Result, YouTubeError};
