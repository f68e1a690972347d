//! Audio transport bridge.
//!
//! The transport is the real audio engine. The core never decodes or renders
//! audio itself; it reaches the engine only through the request/response
//! calls below and learns about progress only by polling
//! [`TransportClient::get_position`]. Host applications provide the concrete
//! implementation (an IPC command channel, an HTTP control API, an in-process
//! engine handle, ...).
//!
//! Every call may fail. Callers in the core treat failures as transient.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Names the transport call an outcome or log line refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportOperation {
    PlaySelection,
    Play,
    Pause,
    Stop,
    SeekTo,
    SetVolume,
    GetPosition,
    GetDuration,
}

impl TransportOperation {
    /// Stable identifier used in logs and events.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportOperation::PlaySelection => "play_selection",
            TransportOperation::Play => "play",
            TransportOperation::Pause => "pause",
            TransportOperation::Stop => "stop",
            TransportOperation::SeekTo => "seek_to",
            TransportOperation::SetVolume => "set_volume",
            TransportOperation::GetPosition => "get_position",
            TransportOperation::GetDuration => "get_duration",
        }
    }

    /// Returns `true` for calls that change what the engine is doing.
    pub fn is_mutating(&self) -> bool {
        !matches!(
            self,
            TransportOperation::GetPosition | TransportOperation::GetDuration
        )
    }
}

impl fmt::Display for TransportOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Asynchronous control surface of the external audio engine.
///
/// Positions and durations are in seconds. A duration of `0.0` means the
/// engine has not determined it yet.
#[async_trait::async_trait]
pub trait TransportClient: Send + Sync {
    /// Replace the engine's queue with `paths` and begin playback of
    /// `paths[start_index]`.
    async fn play_selection(&self, paths: Vec<String>, start_index: usize) -> Result<()>;

    /// Resume playback of the current track.
    async fn play(&self) -> Result<()>;

    /// Halt playback without releasing the current track.
    async fn pause(&self) -> Result<()>;

    /// Halt playback and rewind to the start of the current track.
    async fn stop(&self) -> Result<()>;

    /// Move the playback head to an absolute position (seconds, `>= 0`).
    async fn seek_to(&self, position_secs: f64) -> Result<()>;

    /// Set the output level, linear in `0.0..=1.0`.
    async fn set_volume(&self, linear: f64) -> Result<()>;

    /// Current playback head in seconds.
    async fn get_position(&self) -> Result<f64>;

    /// Total length of the current track in seconds, `0.0` when unknown.
    async fn get_duration(&self) -> Result<f64>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BridgeError;
    use mockall::mock;
    use std::sync::Arc;

    mock! {
        Transport {}

        #[async_trait::async_trait]
        impl TransportClient for Transport {
            async fn play_selection(&self, paths: Vec<String>, start_index: usize) -> Result<()>;
            async fn play(&self) -> Result<()>;
            async fn pause(&self) -> Result<()>;
            async fn stop(&self) -> Result<()>;
            async fn seek_to(&self, position_secs: f64) -> Result<()>;
            async fn set_volume(&self, linear: f64) -> Result<()>;
            async fn get_position(&self) -> Result<f64>;
            async fn get_duration(&self) -> Result<f64>;
        }
    }

    #[test]
    fn test_operation_names_are_stable() {
        assert_eq!(TransportOperation::PlaySelection.as_str(), "play_selection");
        assert_eq!(TransportOperation::SeekTo.to_string(), "seek_to");
        assert!(TransportOperation::SetVolume.is_mutating());
        assert!(!TransportOperation::GetPosition.is_mutating());
        assert!(!TransportOperation::GetDuration.is_mutating());
    }

    #[tokio::test]
    async fn test_transport_is_object_safe() {
        let mut mock = MockTransport::new();
        mock.expect_get_position().returning(|| Ok(12.5));
        mock.expect_pause()
            .returning(|| Err(BridgeError::Rejected("engine busy".into())));

        let transport: Arc<dyn TransportClient> = Arc::new(mock);
        assert_eq!(transport.get_position().await.unwrap(), 12.5);
        assert!(transport.pause().await.is_err());
    }
}
