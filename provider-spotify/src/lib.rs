//! # Spotify Provider
//!
//! Implements `DestinationCatalog` for the Spotify Web API.
//!
//! ## Overview
//!
//! This module provides:
//! - Track search returning the single best hit
//! - Playlist creation under the user's account
//! - Appending track URIs to a playlist
//! - Bounded backoff on HTTP 429 before surfacing a rate-limit error

pub mod connector;
pub mod error;
pub mod types;

pub use connector::SpotifyConnector;
pub use error::{Result, SpotifyError};
