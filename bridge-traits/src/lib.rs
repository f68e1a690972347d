//! # Host Bridge Traits
//!
//! Contracts between the playback core and the host application.
//!
//! ## Overview
//!
//! The core keeps a local view of playback state consistent with an audio
//! engine it does not own. Everything it needs from the outside world is
//! expressed as a trait here, and each host ships concrete implementations.
//!
//! ## Traits
//!
//! ### Playback
//! - [`TransportClient`](transport::TransportClient) - Commands and queries for the external audio engine
//!
//! ### Library
//! - [`TrackSource`](library::TrackSource) - Produces ordered track listings for a library root
//! - [`ArtworkResolver`](library::ArtworkResolver) - Thumbnail and embedded cover lookups
//!
//! ### Utilities
//! - [`LoggerSink`](log::LoggerSink) - Forward structured logs to host logging
//!
//! ## Error Handling
//!
//! All bridge traits use [`BridgeError`](error::BridgeError). Implementations
//! should convert host-specific failures (IPC errors, HTTP status codes,
//! engine errors) into it with a message that names what was attempted.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` so implementations can be shared
//! as `Arc<dyn Trait>` across async tasks.
//!
//! ## Example
//!
//! ```ignore
//! use bridge_traits::transport::TransportClient;
//! use bridge_traits::error::Result;
//! use async_trait::async_trait;
//!
//! pub struct IpcTransport {
//!     channel: MyIpcChannel,
//! }
//!
//! #[async_trait]
//! impl TransportClient for IpcTransport {
//!     async fn get_position(&self) -> Result<f64> {
//!         self.channel.invoke("get_position").await
//!     }
//!     // ...
//! }
//! ```

pub mod error;
pub mod library;
pub mod log;
pub mod transport;

pub use error::BridgeError;

// Re-export commonly used types
pub use library::{ArtworkResolver, ScannedTrack, TrackSource};
pub use log::{ConsoleLogger, LogEntry, LogLevel, LoggerSink};
pub use transport::{TransportClient, TransportOperation};
