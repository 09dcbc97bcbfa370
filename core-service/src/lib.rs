//! Conversion service façade.
//!
//! This crate turns a validated [`ConverterConfig`] into a
//! [`ConversionService`] that host applications call once per request. Each
//! call builds request-scoped catalog connectors from the caller's
//! credentials, runs the conversion pipeline, and renders the outcome as a
//! serializable [`ConversionResponse`]. Desktop hosts typically enable the
//! `desktop-shims` feature so the configuration picks up the reqwest-backed
//! HTTP client without further wiring.
//!
//! ```no_run
//! # async fn example() -> core_service::Result<()> {
//! use core_service::{
//!     AccessCredential, CancellationToken, ConversionRequest, ConversionService,
//!     ConverterConfig, RequestContext,
//! };
//!
//! let config = ConverterConfig::builder().youtube_api_key("api-key").build()?;
//! let service = ConversionService::new(config)?;
//!
//! let response = service
//!     .convert(
//!         ConversionRequest {
//!             source_playlist_url: "https://www.youtube.com/playlist?list=PL123".to_string(),
//!             destination_playlist_name: None,
//!         },
//!         RequestContext::new(AccessCredential::new("user-token"), "spotify-user"),
//!         &CancellationToken::new(),
//!     )
//!     .await;
//! println!("{}", response.status_code());
//! # Ok(())
//! # }
//! ```

pub mod contract;
pub mod error;
pub mod service;

pub use contract::{
    ConversionRequest, ConversionResponse, ConversionSummary, ErrorBody, RequestContext,
};
pub use error::{Result, ServiceError};
pub use service::ConversionService;

pub use bridge_traits::AccessCredential;
pub use core_async::sync::CancellationToken;
pub use core_runtime::{ConverterConfig, ConverterConfigBuilder, SearchCredentialPolicy};
