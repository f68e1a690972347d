//! Volume and mute handling.
//!
//! The stored level survives mute transitions: muting only changes what the
//! transport receives, so unmuting restores exactly the pre-mute level.

/// Owns the linear volume level and the mute flag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeController {
    volume: f64,
    muted: bool,
}

impl VolumeController {
    pub fn new(initial: f64) -> Self {
        Self {
            volume: clamp_level(initial),
            muted: false,
        }
    }

    /// Stored level in `0.0..=1.0`, unaffected by mute.
    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Level the transport should be at.
    pub fn effective(&self) -> f64 {
        if self.muted {
            0.0
        } else {
            self.volume
        }
    }

    /// Stores `level` clamped into range.
    ///
    /// Returns the value to forward to the transport, or `None` while muted
    /// since the transport must keep receiving silence.
    pub fn set_linear(&mut self, level: f64) -> Option<f64> {
        self.volume = clamp_level(level);
        (!self.muted).then_some(self.volume)
    }

    /// Moves the stored level by `delta`, same forwarding rule as [`set_linear`](Self::set_linear).
    pub fn nudge(&mut self, delta: f64) -> Option<f64> {
        self.set_linear(self.volume + delta)
    }

    /// Flips mute and returns the value to forward: `0.0` when muting,
    /// the stored level when unmuting.
    pub fn toggle_mute(&mut self) -> f64 {
        self.muted = !self.muted;
        self.effective()
    }
}

impl Default for VolumeController {
    fn default() -> Self {
        Self::new(1.0)
    }
}

// NaN is treated as silence.
fn clamp_level(level: f64) -> f64 {
    if level.is_nan() {
        0.0
    } else {
        level.clamp(0.0, 1.0)
    }
}
