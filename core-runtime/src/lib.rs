//! # Core Runtime Module
//!
//! Foundational runtime infrastructure for the playlist converter:
//! - Logging and tracing infrastructure
//! - Converter configuration and validation
//!
//! ## Overview
//!
//! Every other crate in the workspace reads its tunables from
//! [`ConverterConfig`](config::ConverterConfig) and logs through the
//! subscriber installed by [`init_logging`](logging::init_logging).

pub mod config;
pub mod error;
pub mod logging;

pub use config::{ConverterConfig, ConverterConfigBuilder, RateLimitConfig, SearchCredentialPolicy};
pub use error::{Error, Result};
