//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the playback core:
//! - Logging and tracing infrastructure
//! - Configuration management
//! - Event bus system
//!
//! ## Overview
//!
//! This crate contains the runtime utilities that the playback engine and the
//! service façade depend on. It fixes the logging conventions, the tunables of
//! the reconciliation loop, and the broadcast channel used to publish playback
//! events to interested observers.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use config::{PlayerConfig, PlayerConfigBuilder};
pub use error::{Error, Result};
pub use events::{EventBus, PlayerEvent};
