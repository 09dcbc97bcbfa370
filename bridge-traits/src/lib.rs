//! # Host Bridge Traits
//!
//! Contracts between the conversion core and the things it does not own.
//!
//! ## Overview
//!
//! The core never talks to a network library or a vendor SDK directly.
//! Everything it needs from the outside world is expressed as a trait here
//! and implemented elsewhere:
//!
//! - [`HttpClient`](http::HttpClient) - Async HTTP transport (desktop: `bridge-desktop`)
//! - [`SourceCatalog`](catalog::SourceCatalog) - Paged playlist listing (`provider-youtube`)
//! - [`DestinationCatalog`](catalog::DestinationCatalog) - Search and playlist writes (`provider-spotify`)
//!
//! ## Error Handling
//!
//! Transport failures use [`BridgeError`](error::BridgeError). Catalog
//! connectors translate both transport failures and upstream error
//! responses into the closed [`CatalogError`](catalog::CatalogError) enum,
//! so code above the connectors matches on kinds only.
//!
//! ## Thread Safety
//!
//! All traits require `Send + Sync` so connectors can be shared across the
//! bounded task pool that runs per-track searches.

pub mod catalog;
pub mod error;
pub mod http;

pub use error::BridgeError;

pub use catalog::{
    AccessCredential, CatalogError, CatalogTrack, CreatedPlaylist, DestinationCatalog,
    SourceCatalog, SourceItem, SourcePage,
};
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse, RetryPolicy};
