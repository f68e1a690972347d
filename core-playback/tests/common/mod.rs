//! Scripted transport shared by the integration tests.

#![allow(dead_code)]

use bridge_traits::error::{BridgeError, Result};
use bridge_traits::transport::{TransportClient, TransportOperation};
use core_playback::{PlayerStore, Track};
use core_runtime::config::PlayerConfig;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::oneshot;

/// A transport call as observed by [`FakeTransport`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    PlaySelection { paths: Vec<String>, start_index: usize },
    Play,
    Pause,
    Stop,
    SeekTo(f64),
    SetVolume(f64),
    GetPosition,
    GetDuration,
}

impl Call {
    pub fn is_query(&self) -> bool {
        matches!(self, Call::GetPosition | Call::GetDuration)
    }
}

/// Records every call and answers queries from scripted values.
#[derive(Default)]
pub struct FakeTransport {
    calls: Mutex<Vec<Call>>,
    position: Mutex<f64>,
    duration: Mutex<f64>,
    failing: Mutex<HashSet<TransportOperation>>,
    position_gate: Mutex<Option<oneshot::Receiver<f64>>>,
    selection_gate: Mutex<Option<oneshot::Receiver<()>>>,
}

impl FakeTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_position(&self, secs: f64) {
        *self.position.lock() = secs;
    }

    pub fn set_duration(&self, secs: f64) {
        *self.duration.lock() = secs;
    }

    /// Makes every call of `operation` fail until [`recover`](Self::recover).
    pub fn fail(&self, operation: TransportOperation) {
        self.failing.lock().insert(operation);
    }

    pub fn recover(&self, operation: TransportOperation) {
        self.failing.lock().remove(&operation);
    }

    /// Holds the next position query until the returned sender fires.
    pub fn gate_next_position(&self) -> oneshot::Sender<f64> {
        let (tx, rx) = oneshot::channel();
        *self.position_gate.lock() = Some(rx);
        tx
    }

    /// Holds the next `play_selection` until the returned sender fires or
    /// is dropped.
    pub fn gate_next_selection(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.selection_gate.lock() = Some(rx);
        tx
    }

    pub fn selections(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| matches!(call, Call::PlaySelection { .. }))
            .count()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    /// Calls that command the engine, without position/duration queries.
    pub fn commands(&self) -> Vec<Call> {
        self.calls
            .lock()
            .iter()
            .filter(|call| !call.is_query())
            .cloned()
            .collect()
    }

    pub fn count(&self, expected: &Call) -> usize {
        self.calls.lock().iter().filter(|call| *call == expected).count()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    fn record(&self, call: Call, operation: TransportOperation) -> Result<()> {
        self.calls.lock().push(call);
        if self.failing.lock().contains(&operation) {
            return Err(BridgeError::Rejected(format!("{operation} refused")));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl TransportClient for FakeTransport {
    async fn play_selection(&self, paths: Vec<String>, start_index: usize) -> Result<()> {
        self.record(
            Call::PlaySelection { paths, start_index },
            TransportOperation::PlaySelection,
        )?;
        let gate = self.selection_gate.lock().take();
        if let Some(rx) = gate {
            rx.await.ok();
        }
        Ok(())
    }

    async fn play(&self) -> Result<()> {
        self.record(Call::Play, TransportOperation::Play)
    }

    async fn pause(&self) -> Result<()> {
        self.record(Call::Pause, TransportOperation::Pause)
    }

    async fn stop(&self) -> Result<()> {
        self.record(Call::Stop, TransportOperation::Stop)
    }

    async fn seek_to(&self, position_secs: f64) -> Result<()> {
        self.record(Call::SeekTo(position_secs), TransportOperation::SeekTo)
    }

    async fn set_volume(&self, linear: f64) -> Result<()> {
        self.record(Call::SetVolume(linear), TransportOperation::SetVolume)
    }

    async fn get_position(&self) -> Result<f64> {
        self.record(Call::GetPosition, TransportOperation::GetPosition)?;
        let gate = self.position_gate.lock().take();
        match gate {
            Some(rx) => rx
                .await
                .map_err(|_| BridgeError::OperationFailed("gate dropped".into())),
            None => Ok(*self.position.lock()),
        }
    }

    async fn get_duration(&self) -> Result<f64> {
        self.record(Call::GetDuration, TransportOperation::GetDuration)?;
        Ok(*self.duration.lock())
    }
}

/// Four tracks with durations `[212, 185, 241, 198]`.
pub fn four_tracks() -> Vec<Track> {
    [212.0, 185.0, 241.0, 198.0]
        .iter()
        .enumerate()
        .map(|(i, secs)| {
            Track::new(format!("/music/{i}.flac"), format!("Track {i}"), "Artist")
                .with_duration(*secs)
        })
        .collect()
}

pub fn paths(tracks: &[Track]) -> Vec<String> {
    tracks.iter().map(|track| track.path.clone()).collect()
}

/// Config for tests that drive ticks by hand.
pub fn manual_config() -> PlayerConfig {
    PlayerConfig::builder()
        .auto_start_polling(false)
        .build()
        .expect("valid config")
}

pub fn manual_store() -> (PlayerStore, Arc<FakeTransport>) {
    let transport = FakeTransport::new();
    let store = PlayerStore::new(transport.clone(), manual_config()).expect("valid config");
    (store, transport)
}
