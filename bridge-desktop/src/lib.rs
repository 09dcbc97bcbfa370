//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for desktop and server hosts
//! (macOS, Windows, Linux).
//!
//! - `HttpClient` using `reqwest`
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::ReqwestHttpClient;
//! use std::sync::Arc;
//!
//! let http_client = Arc::new(ReqwestHttpClient::new()?);
//! // Hand it to ConverterConfig::builder().http_client(http_client)
//! ```

mod http;

pub use http::ReqwestHttpClient;
