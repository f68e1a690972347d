//! # Player Configuration
//!
//! Tunables for the playback synchronization engine.
//!
//! ## Overview
//!
//! `PlayerConfig` holds the timing and step constants the engine uses when
//! reconciling its local state with the transport. Every field has a default
//! matching the behaviour hosts expect out of the box, so most applications
//! only override one or two values.
//!
//! ## Usage
//!
//! ### Builder
//!
//! ```rust
//! use core_runtime::config::PlayerConfig;
//!
//! let config = PlayerConfig::builder()
//!     .poll_interval_ms(500)
//!     .initial_volume(0.8)
//!     .build()
//!     .expect("valid config");
//!
//! assert_eq!(config.poll_interval().as_millis(), 500);
//! ```
//!
//! ### From JSON
//!
//! Missing fields fall back to their defaults:
//!
//! ```rust
//! use core_runtime::config::PlayerConfig;
//!
//! let config = PlayerConfig::from_json_str(r#"{ "seek_step_secs": 5.0 }"#).unwrap();
//! assert_eq!(config.seek_step_secs, 5.0);
//! assert_eq!(config.poll_interval_ms, 250);
//! ```
//!
//! ## Error Handling
//!
//! Invalid values are rejected with an actionable [`Error::Config`]:
//!
//! ```should_panic
//! use core_runtime::config::PlayerConfig;
//!
//! PlayerConfig::builder()
//!     .initial_volume(1.5)
//!     .build()
//!     .expect("Should fail - volume out of range");
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default poll period of the reconciliation loop.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 250;

/// Minimum forward movement (seconds) accepted as proof that playback started.
pub const DEFAULT_PROGRESS_EPSILON_SECS: f64 = 0.05;

/// Duration assumed for a track whose length the library could not determine.
pub const DEFAULT_FALLBACK_DURATION_SECS: f64 = 240.0;

/// Configuration for the playback engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Period of the poll loop in milliseconds.
    ///
    /// Position granularity is bounded by this value.
    ///
    /// Default: 250.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Forward delta (seconds) a poll must observe before buffering clears.
    ///
    /// Default: 0.05.
    #[serde(default = "default_progress_epsilon")]
    pub progress_epsilon_secs: f64,

    /// Duration used until the transport reports one, for tracks scanned
    /// without a known length.
    ///
    /// Default: 240.
    #[serde(default = "default_fallback_duration")]
    pub fallback_duration_secs: f64,

    /// Linear volume at startup, `0.0..=1.0`.
    ///
    /// Default: 0.5.
    #[serde(default = "default_initial_volume")]
    pub initial_volume: f64,

    /// Step used by skip back/forward, in seconds.
    ///
    /// Default: 10.
    #[serde(default = "default_seek_step")]
    pub seek_step_secs: f64,

    /// Step used by volume up/down, linear.
    ///
    /// Default: 0.05.
    #[serde(default = "default_volume_step")]
    pub volume_step: f64,

    /// Capacity of the playback event bus.
    ///
    /// Default: 100.
    #[serde(default = "default_event_buffer_size")]
    pub event_buffer_size: usize,

    /// Start the poll loop automatically when playback begins.
    ///
    /// Hosts that drive reconciliation from their own timer through
    /// `poll_once` turn this off.
    ///
    /// Default: true.
    #[serde(default = "default_auto_start_polling")]
    pub auto_start_polling: bool,
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

fn default_progress_epsilon() -> f64 {
    DEFAULT_PROGRESS_EPSILON_SECS
}

fn default_fallback_duration() -> f64 {
    DEFAULT_FALLBACK_DURATION_SECS
}

fn default_initial_volume() -> f64 {
    0.5
}

fn default_seek_step() -> f64 {
    10.0
}

fn default_volume_step() -> f64 {
    0.05
}

fn default_event_buffer_size() -> usize {
    crate::events::DEFAULT_EVENT_BUFFER_SIZE
}

fn default_auto_start_polling() -> bool {
    true
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            progress_epsilon_secs: default_progress_epsilon(),
            fallback_duration_secs: default_fallback_duration(),
            initial_volume: default_initial_volume(),
            seek_step_secs: default_seek_step(),
            volume_step: default_volume_step(),
            event_buffer_size: default_event_buffer_size(),
            auto_start_polling: default_auto_start_polling(),
        }
    }
}

impl PlayerConfig {
    /// Creates a new builder seeded with the defaults.
    pub fn builder() -> PlayerConfigBuilder {
        PlayerConfigBuilder::default()
    }

    /// Parses a JSON document and validates the result.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: PlayerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Poll period as a [`Duration`].
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Validates the configuration and returns an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.poll_interval_ms == 0 {
            return Err(Error::Config(
                "poll_interval_ms must be greater than 0".to_string(),
            ));
        }

        if !self.progress_epsilon_secs.is_finite() || self.progress_epsilon_secs < 0.0 {
            return Err(Error::Config(
                "progress_epsilon_secs must be a finite, non-negative number of seconds"
                    .to_string(),
            ));
        }

        if !self.fallback_duration_secs.is_finite() || self.fallback_duration_secs <= 0.0 {
            return Err(Error::Config(
                "fallback_duration_secs must be greater than 0. \
                 Use a typical track length so the seek bar stays usable before \
                 the transport reports the real duration."
                    .to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.initial_volume) {
            return Err(Error::Config(
                "initial_volume must be between 0.0 and 1.0".to_string(),
            ));
        }

        if !self.seek_step_secs.is_finite() || self.seek_step_secs <= 0.0 {
            return Err(Error::Config(
                "seek_step_secs must be greater than 0".to_string(),
            ));
        }

        if !self.volume_step.is_finite() || self.volume_step <= 0.0 || self.volume_step > 1.0 {
            return Err(Error::Config(
                "volume_step must be in (0.0, 1.0]".to_string(),
            ));
        }

        if self.event_buffer_size == 0 {
            return Err(Error::Config(
                "event_buffer_size must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for constructing [`PlayerConfig`] instances.
#[derive(Debug, Default)]
pub struct PlayerConfigBuilder {
    config: PlayerConfig,
}

impl PlayerConfigBuilder {
    /// Sets the poll period in milliseconds.
    pub fn poll_interval_ms(mut self, millis: u64) -> Self {
        self.config.poll_interval_ms = millis;
        self
    }

    /// Sets the buffering-clear threshold in seconds.
    pub fn progress_epsilon_secs(mut self, secs: f64) -> Self {
        self.config.progress_epsilon_secs = secs;
        self
    }

    /// Sets the duration assumed for tracks without a known length.
    pub fn fallback_duration_secs(mut self, secs: f64) -> Self {
        self.config.fallback_duration_secs = secs;
        self
    }

    /// Sets the startup volume.
    pub fn initial_volume(mut self, volume: f64) -> Self {
        self.config.initial_volume = volume;
        self
    }

    /// Sets the skip back/forward step.
    pub fn seek_step_secs(mut self, secs: f64) -> Self {
        self.config.seek_step_secs = secs;
        self
    }

    /// Sets the volume up/down step.
    pub fn volume_step(mut self, step: f64) -> Self {
        self.config.volume_step = step;
        self
    }

    /// Sets the event bus capacity.
    pub fn event_buffer_size(mut self, size: usize) -> Self {
        self.config.event_buffer_size = size;
        self
    }

    /// Enables or disables the automatic poll loop.
    pub fn auto_start_polling(mut self, enabled: bool) -> Self {
        self.config.auto_start_polling = enabled;
        self
    }

    /// Validates and returns the configuration.
    pub fn build(self) -> Result<PlayerConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
