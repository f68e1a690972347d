//! Library and artwork collaborators.
//!
//! Scanning folders and resolving cover art are host concerns. The core only
//! consumes their output: ordered track listings that feed the playback
//! queue, and cover-image references for the currently displayed tracks.

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// A scanned audio file as reported by the host library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScannedTrack {
    /// Absolute path; unique within a library.
    pub path: String,
    pub title: String,
    pub artist: String,
    #[serde(default)]
    pub album: Option<String>,
    /// Duration in seconds, `0.0` when the scanner could not determine it.
    #[serde(default)]
    pub duration_secs: f64,
    #[serde(default)]
    pub has_art: bool,
}

/// Producer of track listings for a library root.
#[async_trait::async_trait]
pub trait TrackSource: Send + Sync {
    /// Scan `root` and return its tracks in display order.
    async fn scan(&self, root: &str) -> Result<Vec<ScannedTrack>>;
}

/// Resolves cover images for track paths.
///
/// Returned strings are opaque to the core: a filesystem path, an asset URL
/// or a `data:` URL, whatever the view layer knows how to display.
#[async_trait::async_trait]
pub trait ArtworkResolver: Send + Sync {
    /// Path or URL of a cached thumbnail of roughly `size` pixels.
    async fn thumbnail(&self, path: &str, size: u32) -> Result<Option<String>>;

    /// Embedded artwork encoded as a data URL.
    async fn embedded(&self, path: &str) -> Result<Option<String>>;
}
