//! Workspace placeholder crate.
//!
//! This crate exposes feature flags that map to the individual workspace
//! crates. Host applications can depend on `player-sync-workspace` and pick
//! either the full service façade (`service`, the default) or the bare
//! playback engine (`engine-only`) without wiring each crate individually.

#[cfg(feature = "service")]
pub use core_service::*;

#[cfg(feature = "engine-only")]
pub use core_playback as playback;

#[cfg(feature = "engine-only")]
pub use core_runtime as runtime;
