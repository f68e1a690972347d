//! Core playback data types.
//!
//! [`Track`] is the immutable queue entry, [`PlaybackSnapshot`] is the
//! read-only view of the store handed to subscribers.

use crate::error::{PlaybackError, Result};
use bridge_traits::library::ScannedTrack;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Title shown when no track is current.
pub const NO_TRACK_TITLE: &str = "No track loaded";

// ============================================================================
// Session
// ============================================================================

/// Identifies one store instance in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Track
// ============================================================================

/// A playable audio file, identified by its path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub path: String,
    pub title: String,
    pub artist: String,
    #[serde(default)]
    pub album: Option<String>,
    /// Length in seconds, `0.0` when unknown.
    #[serde(default)]
    pub duration_secs: f64,
    #[serde(default)]
    pub has_art: bool,
}

impl Track {
    pub fn new(
        path: impl Into<String>,
        title: impl Into<String>,
        artist: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            title: title.into(),
            artist: artist.into(),
            album: None,
            duration_secs: 0.0,
            has_art: false,
        }
    }

    pub fn with_duration(mut self, secs: f64) -> Self {
        self.duration_secs = sanitize_duration(secs);
        self
    }

    pub fn with_album(mut self, album: impl Into<String>) -> Self {
        self.album = Some(album.into());
        self
    }

    pub fn with_art(mut self, has_art: bool) -> Self {
        self.has_art = has_art;
        self
    }

    /// Duration if the scanner determined one.
    pub fn known_duration(&self) -> Option<f64> {
        (self.duration_secs > 0.0).then_some(self.duration_secs)
    }
}

impl TryFrom<ScannedTrack> for Track {
    type Error = PlaybackError;

    fn try_from(scanned: ScannedTrack) -> Result<Self> {
        if scanned.path.trim().is_empty() {
            return Err(PlaybackError::InvalidTrack(format!(
                "track '{}' has an empty path",
                scanned.title
            )));
        }

        Ok(Self {
            path: scanned.path,
            title: scanned.title,
            artist: scanned.artist,
            album: scanned.album,
            duration_secs: sanitize_duration(scanned.duration_secs),
            has_art: scanned.has_art,
        })
    }
}

fn sanitize_duration(secs: f64) -> f64 {
    if secs.is_finite() && secs > 0.0 {
        secs
    } else {
        0.0
    }
}

// ============================================================================
// Snapshot
// ============================================================================

/// Seek-control override as seen by the view layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DragState {
    pub active: bool,
    /// Position under the pointer, only meaningful while `active`.
    pub preview_position: f64,
}

/// Immutable copy of the playback state.
///
/// `revision` increases with every state change and lets listeners discard
/// a snapshot older than one they already rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackSnapshot {
    pub revision: u64,
    pub queue: Arc<Vec<Track>>,
    pub queue_index: Option<usize>,
    pub current_track: Option<Track>,
    pub is_playing: bool,
    pub is_buffering: bool,
    pub position: f64,
    pub duration: f64,
    pub volume: f64,
    pub muted: bool,
    pub drag: DragState,
}

impl PlaybackSnapshot {
    pub fn title(&self) -> &str {
        self.current_track
            .as_ref()
            .map_or(NO_TRACK_TITLE, |track| track.title.as_str())
    }

    pub fn artist(&self) -> &str {
        self.current_track
            .as_ref()
            .map_or("", |track| track.artist.as_str())
    }

    /// The seek control is usable once a duration is known.
    pub fn can_seek(&self) -> bool {
        self.duration > 0.0
    }

    /// Position the seek control should show: the preview while dragging.
    pub fn display_position(&self) -> f64 {
        if self.drag.active {
            self.drag.preview_position
        } else {
            self.position
        }
    }

    /// Displayed position as a percentage of the duration, `0.0..=100.0`.
    pub fn progress_percent(&self) -> f64 {
        if self.duration <= 0.0 {
            return 0.0;
        }
        (self.display_position() / self.duration * 100.0).clamp(0.0, 100.0)
    }

    /// Level the transport is currently expected to be at.
    pub fn effective_volume(&self) -> f64 {
        if self.muted {
            0.0
        } else {
            self.volume
        }
    }
}

/// Formats seconds as `m:ss`. Non-finite or negative input reads `0:00`.
///
/// ```rust
/// use core_playback::format_time;
///
/// assert_eq!(format_time(75.9), "1:15");
/// assert_eq!(format_time(f64::NAN), "0:00");
/// ```
pub fn format_time(secs: f64) -> String {
    if !secs.is_finite() || secs < 0.0 {
        return "0:00".to_string();
    }
    let whole = secs.floor() as u64;
    format!("{}:{:02}", whole / 60, whole % 60)
}
