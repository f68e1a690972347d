//! Seek-control drag session.
//!
//! While the user scrubs, the pointer position is kept as a local preview.
//! Nothing reaches the transport until the drag is committed, and the poll
//! loop leaves `position` alone while a session is active.

use crate::types::DragState;

/// `Idle` / `Dragging` state machine for the seek control.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DragSession {
    preview: Option<f64>,
}

impl DragSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.preview.is_some()
    }

    pub fn preview_position(&self) -> Option<f64> {
        self.preview
    }

    /// Pointer down. Starts previewing from `from`.
    ///
    /// Returns `false` if a drag was already in progress.
    pub fn begin(&mut self, from: f64) -> bool {
        if self.is_active() {
            return false;
        }
        self.preview = Some(from);
        true
    }

    /// Pointer moved. Ignored while idle.
    pub fn update(&mut self, preview: f64) -> bool {
        match self.preview.as_mut() {
            Some(current) => {
                *current = preview;
                true
            }
            None => false,
        }
    }

    /// Pointer up or left the control. Returns the preview to seek to, or
    /// `None` for a stray release while idle.
    pub fn commit(&mut self) -> Option<f64> {
        self.preview.take()
    }

    pub fn state(&self) -> DragState {
        DragState {
            active: self.is_active(),
            preview_position: self.preview.unwrap_or(0.0),
        }
    }
}
