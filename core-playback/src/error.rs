//! # Playback Error Types
//!
//! Errors raised while building playback inputs or talking to the transport.
//!
//! Store operations never return these directly. Transport failures are
//! folded into [`Dispatch::TransientFailure`](crate::Dispatch) so callers can
//! observe them without the store ever rolling back local state.

use bridge_traits::error::BridgeError;
use bridge_traits::transport::TransportOperation;
use thiserror::Error;

/// Errors that can occur during playback operations.
#[derive(Error, Debug)]
pub enum PlaybackError {
    // ========================================================================
    // Input Errors
    // ========================================================================
    /// A scanned track could not be turned into a playable [`Track`](crate::Track).
    #[error("Invalid track: {0}")]
    InvalidTrack(String),

    /// The store was handed a configuration that does not validate.
    #[error("Invalid player configuration: {0}")]
    InvalidConfig(#[from] core_runtime::Error),

    /// Queue index outside the current queue.
    #[error("Queue index {index} out of range (queue length {len})")]
    IndexOutOfRange { index: usize, len: usize },

    // ========================================================================
    // Transport Errors
    // ========================================================================
    /// The transport rejected or failed a call.
    #[error("Transport call `{operation}` failed: {source}")]
    Transport {
        operation: TransportOperation,
        #[source]
        source: BridgeError,
    },

    /// The transport answered with a value the engine cannot use.
    #[error("Transport call `{operation}` returned unusable value {value}")]
    InvalidReading {
        operation: TransportOperation,
        value: f64,
    },

    /// Internal error (should not occur in normal operation).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PlaybackError {
    /// Wraps a bridge error with the transport call that produced it.
    pub fn transport(operation: TransportOperation, source: BridgeError) -> Self {
        PlaybackError::Transport { operation, source }
    }

    /// Returns `true` if this error is transient and the operation can be retried.
    ///
    /// The engine cannot tell a busy transport from a broken one, so every
    /// transport-side failure counts as transient. Input errors do not.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            PlaybackError::Transport { .. } | PlaybackError::InvalidReading { .. }
        )
    }

    /// The transport call this error came from, if any.
    pub fn operation(&self) -> Option<TransportOperation> {
        match self {
            PlaybackError::Transport { operation, .. }
            | PlaybackError::InvalidReading { operation, .. } => Some(*operation),
            _ => None,
        }
    }
}

/// Result type for playback operations.
pub type Result<T> = std::result::Result<T, PlaybackError>;
