//! # Playback Synchronization Engine
//!
//! Keeps a local view of playback state consistent with an external audio
//! transport that can only be commanded and polled.
//!
//! ## Overview
//!
//! This crate handles:
//! - The canonical playback state and its snapshot subscriptions ([`PlayerStore`])
//! - Periodic reconciliation against the transport, including the buffering
//!   heuristic and end-of-track advance ([`PlayerStore::poll_once`])
//! - Queue navigation with wrap-around ([`QueueManager`])
//! - Seek-control drag sessions that override polled positions ([`DragSession`])
//! - Volume and mute handling ([`VolumeController`])
//!
//! Transport failures never escape as errors. Operations report them as
//! [`Dispatch::TransientFailure`] and keep their optimistic local change.

pub mod drag;
pub mod error;
pub mod outcome;
mod poll;
pub mod queue;
pub mod store;
pub mod subscription;
pub mod types;
pub mod volume;

pub use drag::DragSession;
pub use error::{PlaybackError, Result};
pub use outcome::{Dispatch, TickOutcome};
pub use queue::QueueManager;
pub use store::PlayerStore;
pub use subscription::Subscription;
pub use types::{format_time, DragState, PlaybackSnapshot, SessionId, Track, NO_TRACK_TITLE};
pub use volume::VolumeController;
