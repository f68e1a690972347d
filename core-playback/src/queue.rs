//! Ordered playback queue with wrap-around navigation.

use crate::types::Track;
use std::sync::Arc;

/// Owns the queue and the index of the active track.
///
/// The index is `Some` exactly when the queue is non-empty. The track list
/// sits behind an `Arc` so snapshots share it instead of copying.
#[derive(Debug, Clone, Default)]
pub struct QueueManager {
    tracks: Arc<Vec<Track>>,
    index: Option<usize>,
}

impl QueueManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the queue and selects `start_at` clamped into range.
    ///
    /// An empty `tracks` leaves the queue untouched and returns `None`.
    pub fn replace(&mut self, tracks: Vec<Track>, start_at: i64) -> Option<usize> {
        if tracks.is_empty() {
            return None;
        }
        let last = tracks.len() - 1;
        let index = usize::try_from(start_at.max(0)).map_or(last, |i| i.min(last));
        self.tracks = Arc::new(tracks);
        self.index = Some(index);
        Some(index)
    }

    /// Moves to the following track, wrapping to the start.
    pub fn advance(&mut self) -> Option<usize> {
        let len = self.len();
        let current = self.index?;
        let next = (current + 1) % len;
        self.index = Some(next);
        Some(next)
    }

    /// Moves to the preceding track, wrapping to the end.
    pub fn retreat(&mut self) -> Option<usize> {
        let len = self.len();
        let current = self.index?;
        let prev = (current + len - 1) % len;
        self.index = Some(prev);
        Some(prev)
    }

    /// Selects `index` if it lies inside the queue.
    pub fn select(&mut self, index: usize) -> Option<usize> {
        if index >= self.len() {
            return None;
        }
        self.index = Some(index);
        Some(index)
    }

    pub fn current(&self) -> Option<&Track> {
        self.index.and_then(|i| self.tracks.get(i))
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn tracks(&self) -> &Arc<Vec<Track>> {
        &self.tracks
    }

    /// Track paths in queue order, as the transport expects them.
    pub fn paths(&self) -> Vec<String> {
        self.tracks.iter().map(|track| track.path.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}
