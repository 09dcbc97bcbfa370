//! Workspace placeholder crate.
//!
//! This crate exposes feature flags that map to the individual workspace
//! crates. Hosts can depend on `playlist-bridge-workspace` and enable the
//! `desktop-shims` feature instead of wiring `core-service` and the desktop
//! bridge by hand.

#[cfg(feature = "desktop-shims")]
pub use core_service::*;
