//! # Playback State Store
//!
//! The canonical, observable playback state and the only component that
//! issues state-changing transport calls.
//!
//! ## Overview
//!
//! Every operation follows the same sequence:
//!
//! 1. write the optimistic change under the state lock,
//! 2. release the lock and publish a snapshot to subscribers,
//! 3. await the transport call,
//! 4. report the outcome as a [`Dispatch`].
//!
//! Local state is never rolled back when the transport rejects a call. The
//! failure is logged, published as [`PlayerEvent::TransportFailed`] and
//! returned; the next poll tick or user action heals any divergence.
//!
//! The lock is never held across an `.await`, so a read right after an
//! operation starts always reflects the user's intent, whatever transport
//! responses are still in flight.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use core_playback::{PlayerStore, Track};
//! use core_runtime::config::PlayerConfig;
//! # use bridge_traits::TransportClient;
//! # use std::sync::Arc;
//! # async fn demo(transport: Arc<dyn TransportClient>) -> core_playback::Result<()> {
//! let store = PlayerStore::new(transport, PlayerConfig::default())?;
//! let _sub = store.subscribe(|snapshot| println!("{} {}", snapshot.title(), snapshot.position));
//!
//! let tracks = vec![Track::new("/music/a.flac", "A", "Artist").with_duration(212.0)];
//! store.set_queue_and_play(tracks, 0).await;
//! store.toggle_play().await;
//! # Ok(())
//! # }
//! ```

use crate::drag::DragSession;
use crate::error::{PlaybackError, Result};
use crate::outcome::Dispatch;
use crate::poll::PollHandle;
use crate::queue::QueueManager;
use crate::subscription::{Listener, SubscriberRegistry, Subscription};
use crate::types::{PlaybackSnapshot, SessionId, Track};
use crate::volume::VolumeController;
use bridge_traits::error::BridgeError;
use bridge_traits::transport::{TransportClient, TransportOperation};
use core_runtime::config::PlayerConfig;
use core_runtime::events::{EventBus, PlayerEvent};
use core_runtime::logging::strip_path;
use parking_lot::Mutex;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info, warn};

// ============================================================================
// State
// ============================================================================

/// Mutable state behind the store lock.
#[derive(Debug)]
pub(crate) struct PlaybackState {
    pub(crate) queue: QueueManager,
    pub(crate) volume: VolumeController,
    pub(crate) drag: DragSession,
    pub(crate) is_playing: bool,
    pub(crate) is_buffering: bool,
    pub(crate) position: f64,
    pub(crate) duration: f64,
    /// Last position the transport reported; baseline of the buffering check.
    pub(crate) last_reported: f64,
    /// Duration still to be confirmed by the transport.
    pub(crate) duration_pending: bool,
    /// Duration is the fallback guess, not a real track length.
    pub(crate) duration_estimated: bool,
    /// A `play_selection` is in flight; the engine may still report the
    /// previous track.
    pub(crate) selection_pending: bool,
    /// Bumped on every track load and on stop.
    pub(crate) track_epoch: u64,
    pub(crate) revision: u64,
}

/// A track that just became current and must be sent to the transport.
#[derive(Debug)]
pub(crate) struct TrackLoad {
    pub(crate) epoch: u64,
    pub(crate) index: usize,
    pub(crate) path: String,
    pub(crate) paths: Vec<String>,
}

impl PlaybackState {
    fn new(config: &PlayerConfig) -> Self {
        Self {
            queue: QueueManager::new(),
            volume: VolumeController::new(config.initial_volume),
            drag: DragSession::new(),
            is_playing: false,
            is_buffering: false,
            position: 0.0,
            duration: 0.0,
            last_reported: 0.0,
            duration_pending: false,
            duration_estimated: false,
            selection_pending: false,
            track_epoch: 0,
            revision: 0,
        }
    }

    /// Resets the per-track fields for the queue's current entry.
    fn load_current(&mut self, fallback_duration: f64) -> Option<TrackLoad> {
        let index = self.queue.index()?;
        let track = self.queue.current()?;

        let (duration, estimated) = match track.known_duration() {
            Some(secs) => (secs, false),
            None => (fallback_duration, true),
        };
        let path = track.path.clone();

        self.duration = duration;
        self.duration_estimated = estimated;
        self.duration_pending = true;
        self.position = 0.0;
        self.last_reported = 0.0;
        self.is_buffering = true;
        self.selection_pending = true;
        self.drag = DragSession::new();
        self.track_epoch += 1;

        Some(TrackLoad {
            epoch: self.track_epoch,
            index,
            path,
            paths: self.queue.paths(),
        })
    }

    /// Records an explicit seek to `target`, already clamped.
    fn seek(&mut self, target: f64) {
        self.position = target;
        self.last_reported = target;
        self.is_buffering = true;
    }

    pub(crate) fn has_track(&self) -> bool {
        self.queue.current().is_some()
    }

    pub(crate) fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            revision: self.revision,
            queue: Arc::clone(self.queue.tracks()),
            queue_index: self.queue.index(),
            current_track: self.queue.current().cloned(),
            is_playing: self.is_playing,
            is_buffering: self.is_buffering,
            position: self.position,
            duration: self.duration,
            volume: self.volume.volume(),
            muted: self.volume.is_muted(),
            drag: self.drag.state(),
        }
    }
}

/// Clamps a requested position into `[0, duration]`. Non-finite input maps to 0.
pub(crate) fn clamp_position(secs: f64, duration: f64) -> f64 {
    if !secs.is_finite() {
        return 0.0;
    }
    secs.clamp(0.0, duration.max(0.0))
}

// ============================================================================
// Store
// ============================================================================

pub(crate) struct Shared {
    pub(crate) session_id: SessionId,
    pub(crate) config: PlayerConfig,
    pub(crate) transport: Arc<dyn TransportClient>,
    pub(crate) state: Mutex<PlaybackState>,
    pub(crate) subscribers: SubscriberRegistry,
    pub(crate) events: EventBus,
    pub(crate) poller: Mutex<Option<PollHandle>>,
}

/// Handle to the playback state of one session.
///
/// Cloning is cheap and every clone drives the same state. The poll loop
/// only holds a weak reference, so dropping the last handle stops it.
#[derive(Clone)]
pub struct PlayerStore {
    pub(crate) shared: Arc<Shared>,
}

enum Navigation {
    Next,
    Prev,
    Index(usize),
}

enum NavigationStep {
    QueueEmpty { was_playing: bool },
    Load { load: TrackLoad, resumed: bool },
}

impl PlayerStore {
    /// Creates a store with its own event bus.
    ///
    /// Fails with [`PlaybackError::InvalidConfig`] if `config` does not validate.
    pub fn new(transport: Arc<dyn TransportClient>, config: PlayerConfig) -> Result<Self> {
        config.validate()?;
        let events = EventBus::new(config.event_buffer_size);
        Self::with_events(transport, config, events)
    }

    /// Creates a store publishing to an existing event bus.
    pub fn with_events(
        transport: Arc<dyn TransportClient>,
        config: PlayerConfig,
        events: EventBus,
    ) -> Result<Self> {
        config.validate()?;
        let session_id = SessionId::new();
        debug!(session = %session_id, "playback store created");

        Ok(Self {
            shared: Arc::new(Shared {
                session_id,
                state: Mutex::new(PlaybackState::new(&config)),
                config,
                transport,
                subscribers: SubscriberRegistry::default(),
                events,
                poller: Mutex::new(None),
            }),
        })
    }

    pub(crate) fn from_shared(shared: Arc<Shared>) -> Self {
        Self { shared }
    }

    pub fn session_id(&self) -> SessionId {
        self.shared.session_id
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.shared.config
    }

    pub fn events(&self) -> &EventBus {
        &self.shared.events
    }

    /// Current state as an immutable snapshot.
    pub fn snapshot(&self) -> PlaybackSnapshot {
        self.shared.state.lock().snapshot()
    }

    // ------------------------------------------------------------------------
    // Subscriptions
    // ------------------------------------------------------------------------

    /// Registers `listener`, calls it right away with the current snapshot,
    /// and again after every state change.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&PlaybackSnapshot) + Send + Sync + 'static,
    {
        let listener: Listener = Arc::new(listener);
        let subscription = self.shared.subscribers.add(Arc::clone(&listener));
        listener(&self.snapshot());
        subscription
    }

    pub fn subscriber_count(&self) -> usize {
        self.shared.subscribers.len()
    }

    // ------------------------------------------------------------------------
    // Queue
    // ------------------------------------------------------------------------

    /// Replaces the queue and starts playing `items[start_at]`, with
    /// `start_at` clamped into range. Empty `items` is a no-op.
    ///
    /// `is_playing` turns on once the transport call has resolved; buffering
    /// stays on until the poll loop observes progress.
    pub async fn set_queue_and_play(&self, items: Vec<Track>, start_at: i64) -> Dispatch {
        let fallback = self.shared.config.fallback_duration_secs;
        let load = self.update_if(|state| {
            state.queue.replace(items, start_at)?;
            state.load_current(fallback)
        });

        let Some(load) = load else {
            debug!("set_queue_and_play with an empty selection ignored");
            return Dispatch::NotIssued;
        };

        let epoch = load.epoch;
        let outcome = self.start_track(load).await;

        let started = self.update_if(|state| {
            if state.track_epoch != epoch {
                return None;
            }
            let was_playing = std::mem::replace(&mut state.is_playing, true);
            Some(!was_playing)
        });
        if started == Some(true) {
            self.emit(PlayerEvent::PlaybackToggled { playing: true });
        }
        self.ensure_polling();

        outcome
    }

    /// Moves to the next track, wrapping to the start. Pauses on an empty queue.
    pub async fn next(&self) -> Dispatch {
        self.navigate(Navigation::Next).await
    }

    /// Moves to the previous track, wrapping to the end. Pauses on an empty queue.
    pub async fn prev(&self) -> Dispatch {
        self.navigate(Navigation::Prev).await
    }

    /// Jumps to `index` in the current queue. Out of range is a no-op.
    pub async fn play_index(&self, index: usize) -> Dispatch {
        self.navigate(Navigation::Index(index)).await
    }

    async fn navigate(&self, navigation: Navigation) -> Dispatch {
        let fallback = self.shared.config.fallback_duration_secs;
        let step = self.update_if(|state| {
            if state.queue.is_empty() {
                let was_playing = std::mem::replace(&mut state.is_playing, false);
                return Some(NavigationStep::QueueEmpty { was_playing });
            }

            let moved = match navigation {
                Navigation::Next => state.queue.advance(),
                Navigation::Prev => state.queue.retreat(),
                Navigation::Index(index) => state.queue.select(index),
            };
            moved?;

            let load = state.load_current(fallback)?;
            let resumed = !std::mem::replace(&mut state.is_playing, true);
            Some(NavigationStep::Load { load, resumed })
        });

        match step {
            None => Dispatch::NotIssued,
            Some(NavigationStep::QueueEmpty { was_playing }) => {
                debug!(session = %self.shared.session_id, "navigation on empty queue; paused");
                if was_playing {
                    self.emit(PlayerEvent::PlaybackToggled { playing: false });
                }
                self.emit(PlayerEvent::QueueEnded);
                Dispatch::NotIssued
            }
            Some(NavigationStep::Load { load, resumed }) => {
                if resumed {
                    self.emit(PlayerEvent::PlaybackToggled { playing: true });
                }
                self.ensure_polling();
                self.start_track(load).await
            }
        }
    }

    /// Announces a freshly loaded track and hands the queue to the transport.
    async fn start_track(&self, load: TrackLoad) -> Dispatch {
        info!(
            session = %self.shared.session_id,
            index = load.index,
            path = strip_path(&load.path),
            "loading track"
        );
        self.emit(PlayerEvent::TrackChanged {
            index: load.index,
            path: load.path.clone(),
        });
        self.emit(PlayerEvent::BufferingChanged { buffering: true });

        // Cleared on completion and also if this future is dropped mid-call.
        let _pending = SelectionPending {
            shared: &self.shared,
            epoch: load.epoch,
        };
        self.call(
            TransportOperation::PlaySelection,
            self.shared.transport.play_selection(load.paths, load.index),
        )
        .await
    }

    // ------------------------------------------------------------------------
    // Transport control
    // ------------------------------------------------------------------------

    /// Pauses when playing, resumes otherwise. No-op without a current track.
    pub async fn toggle_play(&self) -> Dispatch {
        let playing = {
            let state = self.shared.state.lock();
            state.has_track().then_some(state.is_playing)
        };

        match playing {
            None => Dispatch::NotIssued,
            Some(true) => self.pause().await,
            Some(false) => self.play().await,
        }
    }

    /// Resumes the current track and enters buffering.
    pub async fn play(&self) -> Dispatch {
        let resumed = self.update_if(|state| {
            if !state.has_track() || state.is_playing {
                return None;
            }
            state.is_playing = true;
            state.is_buffering = true;
            state.last_reported = state.position;
            Some(())
        });
        if resumed.is_none() {
            return Dispatch::NotIssued;
        }

        self.emit(PlayerEvent::PlaybackToggled { playing: true });
        self.emit(PlayerEvent::BufferingChanged { buffering: true });
        self.ensure_polling();
        self.call(TransportOperation::Play, self.shared.transport.play())
            .await
    }

    /// Pauses the current track.
    pub async fn pause(&self) -> Dispatch {
        let paused = self.update_if(|state| {
            if !state.has_track() || !state.is_playing {
                return None;
            }
            state.is_playing = false;
            Some(())
        });
        if paused.is_none() {
            return Dispatch::NotIssued;
        }

        self.emit(PlayerEvent::PlaybackToggled { playing: false });
        self.call(TransportOperation::Pause, self.shared.transport.pause())
            .await
    }

    /// Stops playback, rewinds to 0 and halts the poll loop.
    pub async fn stop(&self) -> Dispatch {
        let stopped = self.update_if(|state| {
            if !state.has_track() {
                return None;
            }
            let was_playing = std::mem::replace(&mut state.is_playing, false);
            let was_buffering = std::mem::replace(&mut state.is_buffering, false);
            state.position = 0.0;
            state.last_reported = 0.0;
            state.drag = DragSession::new();
            // Supersedes any selection still in flight.
            state.selection_pending = false;
            state.track_epoch += 1;
            Some((was_playing, was_buffering))
        });
        let Some((was_playing, was_buffering)) = stopped else {
            return Dispatch::NotIssued;
        };

        self.stop_polling();
        if was_playing {
            self.emit(PlayerEvent::PlaybackToggled { playing: false });
        }
        if was_buffering {
            self.emit(PlayerEvent::BufferingChanged { buffering: false });
        }
        self.call(TransportOperation::Stop, self.shared.transport.stop())
            .await
    }

    // ------------------------------------------------------------------------
    // Seeking
    // ------------------------------------------------------------------------

    /// Seeks to `secs`, clamped into `[0, duration]`. No-op without a current track.
    pub async fn seek_to_seconds(&self, secs: f64) -> Dispatch {
        let target = self.update_if(|state| {
            if !state.has_track() {
                return None;
            }
            let target = clamp_position(secs, state.duration);
            state.seek(target);
            Some(target)
        });

        match target {
            Some(target) => self.issue_seek(target).await,
            None => Dispatch::NotIssued,
        }
    }

    /// Seeks to `percent` (`0..=100`) of the duration. No-op while the
    /// duration is unknown.
    pub async fn seek_to_percent(&self, percent: f64) -> Dispatch {
        let duration = self.shared.state.lock().duration;
        if duration <= 0.0 {
            return Dispatch::NotIssued;
        }
        self.seek_to_seconds(percent_of(percent, duration)).await
    }

    /// Seeks back by the configured step.
    pub async fn skip_back(&self) -> Dispatch {
        self.skip(-self.shared.config.seek_step_secs).await
    }

    /// Seeks forward by the configured step.
    pub async fn skip_forward(&self) -> Dispatch {
        self.skip(self.shared.config.seek_step_secs).await
    }

    async fn skip(&self, delta: f64) -> Dispatch {
        let (position, duration) = {
            let state = self.shared.state.lock();
            (state.position, state.duration)
        };
        if duration <= 0.0 {
            return Dispatch::NotIssued;
        }
        self.seek_to_seconds(position + delta).await
    }

    async fn issue_seek(&self, target: f64) -> Dispatch {
        debug!(session = %self.shared.session_id, position = target, "seeking");
        self.emit(PlayerEvent::Seeked {
            position_secs: target,
        });
        self.emit(PlayerEvent::BufferingChanged { buffering: true });
        self.call(TransportOperation::SeekTo, self.shared.transport.seek_to(target))
            .await
    }

    // ------------------------------------------------------------------------
    // Drag session
    // ------------------------------------------------------------------------

    /// Pointer down on the seek control. Returns `false` if already dragging.
    pub fn begin_drag(&self) -> bool {
        self.update_if(|state| {
            let from = state.position;
            state.drag.begin(from).then_some(())
        })
        .is_some()
    }

    /// Pointer moved to `secs`. Preview only; nothing is sent to the transport.
    pub fn drag_to_seconds(&self, secs: f64) -> bool {
        self.update_if(|state| {
            let preview = clamp_position(secs, state.duration);
            state.drag.update(preview).then_some(())
        })
        .is_some()
    }

    /// Pointer moved to `percent` of the seek control.
    pub fn drag_to_percent(&self, percent: f64) -> bool {
        self.update_if(|state| {
            let preview = clamp_position(percent_of(percent, state.duration), state.duration);
            state.drag.update(preview).then_some(())
        })
        .is_some()
    }

    /// Pointer up, or pointer left the control while dragging.
    ///
    /// Seeks to the preview position. A release without a drag in progress
    /// is ignored, and with an unknown duration the drag just ends.
    pub async fn commit_drag(&self) -> Dispatch {
        let committed = self.update_if(|state| {
            let preview = state.drag.commit()?;
            if state.duration <= 0.0 {
                return Some(None);
            }
            let target = clamp_position(preview, state.duration);
            state.seek(target);
            Some(Some(target))
        });

        match committed {
            Some(Some(target)) => self.issue_seek(target).await,
            Some(None) => {
                debug!("drag ended without a known duration; no seek issued");
                Dispatch::NotIssued
            }
            None => Dispatch::NotIssued,
        }
    }

    // ------------------------------------------------------------------------
    // Volume
    // ------------------------------------------------------------------------

    /// Stores `level` clamped into `[0, 1]`. Forwarded only when not muted.
    pub async fn set_volume_linear(&self, level: f64) -> Dispatch {
        let change = self.update(|state| {
            let forward = state.volume.set_linear(level);
            (forward, state.volume)
        });
        self.publish_volume(change).await
    }

    pub async fn volume_up(&self) -> Dispatch {
        let step = self.shared.config.volume_step;
        let change = self.update(|state| (state.volume.nudge(step), state.volume));
        self.publish_volume(change).await
    }

    pub async fn volume_down(&self) -> Dispatch {
        let step = self.shared.config.volume_step;
        let change = self.update(|state| (state.volume.nudge(-step), state.volume));
        self.publish_volume(change).await
    }

    /// Flips mute. The stored level is never altered.
    pub async fn toggle_mute(&self) -> Dispatch {
        let change = self.update(|state| {
            let forward = state.volume.toggle_mute();
            (Some(forward), state.volume)
        });
        self.publish_volume(change).await
    }

    async fn publish_volume(&self, (forward, volume): (Option<f64>, VolumeController)) -> Dispatch {
        self.emit(PlayerEvent::VolumeChanged {
            volume: volume.volume(),
            muted: volume.is_muted(),
        });

        match forward {
            Some(level) => {
                self.call(
                    TransportOperation::SetVolume,
                    self.shared.transport.set_volume(level),
                )
                .await
            }
            None => Dispatch::NotIssued,
        }
    }

    // ------------------------------------------------------------------------
    // Poll loop control
    // ------------------------------------------------------------------------

    /// Starts the poll loop, replacing any running one.
    ///
    /// Returns `false` when called outside a tokio runtime.
    pub fn start_polling(&self) -> bool {
        let mut poller = self.shared.poller.lock();
        if let Some(previous) = poller.take() {
            previous.cancel();
        }

        match PollHandle::spawn(Arc::downgrade(&self.shared), self.shared.config.poll_interval()) {
            Some(handle) => {
                *poller = Some(handle);
                true
            }
            None => {
                warn!(
                    session = %self.shared.session_id,
                    "no tokio runtime available; poll loop not started"
                );
                false
            }
        }
    }

    pub fn stop_polling(&self) {
        if let Some(handle) = self.shared.poller.lock().take() {
            handle.cancel();
            debug!(session = %self.shared.session_id, "poll loop cancelled");
        }
    }

    pub fn is_polling(&self) -> bool {
        self.shared
            .poller
            .lock()
            .as_ref()
            .is_some_and(PollHandle::is_running)
    }

    fn ensure_polling(&self) {
        if !self.shared.config.auto_start_polling || self.is_polling() {
            return;
        }
        self.start_polling();
    }

    /// Stops polling and drops every subscriber.
    ///
    /// The store stays usable; outstanding [`Subscription`]s become no-ops.
    pub fn dispose(&self) {
        self.stop_polling();
        self.shared.subscribers.clear();
        debug!(session = %self.shared.session_id, "playback store disposed");
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    /// Applies an unconditional change and publishes the new snapshot.
    pub(crate) fn update<R>(&self, change: impl FnOnce(&mut PlaybackState) -> R) -> R {
        let (result, snapshot) = {
            let mut state = self.shared.state.lock();
            let result = change(&mut *state);
            state.revision += 1;
            (result, state.snapshot())
        };
        self.shared.subscribers.publish(&snapshot);
        result
    }

    /// Applies a change that may decline by returning `None`; only an
    /// accepted change is published.
    pub(crate) fn update_if<R>(
        &self,
        change: impl FnOnce(&mut PlaybackState) -> Option<R>,
    ) -> Option<R> {
        let (result, snapshot) = {
            let mut state = self.shared.state.lock();
            let result = change(&mut *state)?;
            state.revision += 1;
            (result, state.snapshot())
        };
        self.shared.subscribers.publish(&snapshot);
        Some(result)
    }

    pub(crate) fn emit(&self, event: PlayerEvent) {
        // No receivers is fine.
        self.shared.events.emit(event).ok();
    }

    async fn call<F>(&self, operation: TransportOperation, request: F) -> Dispatch
    where
        F: Future<Output = std::result::Result<(), BridgeError>>,
    {
        match request.await {
            Ok(()) => {
                debug!(session = %self.shared.session_id, %operation, "transport call applied");
                Dispatch::Applied
            }
            Err(source) => self.transport_failed(PlaybackError::transport(operation, source)),
        }
    }

    fn transport_failed(&self, err: PlaybackError) -> Dispatch {
        self.report_failure(&err);
        Dispatch::from(err)
    }

    /// Logs a failed transport call and publishes it when it matters to
    /// observers.
    ///
    /// A failed query is retried on the next tick, so it is only traced.
    /// Failed commands are published as [`PlayerEvent::TransportFailed`].
    pub(crate) fn report_failure(&self, err: &PlaybackError) {
        let operation = err.operation();
        let retried = err.is_transient() && !operation.is_some_and(|op| op.is_mutating());
        if retried {
            debug!(
                session = %self.shared.session_id,
                error = %err,
                "transport query failed; retrying next tick"
            );
            return;
        }

        warn!(
            session = %self.shared.session_id,
            error = %err,
            "transport call failed; keeping local state"
        );
        if let Some(operation) = operation {
            self.emit(PlayerEvent::TransportFailed {
                operation: operation.to_string(),
                message: err.to_string(),
            });
        }
    }
}

/// Marks the selection of `epoch` as settled when dropped.
struct SelectionPending<'a> {
    shared: &'a Shared,
    epoch: u64,
}

impl Drop for SelectionPending<'_> {
    fn drop(&mut self) {
        // No snapshot needed: the flag is internal.
        let mut state = self.shared.state.lock();
        if state.track_epoch == self.epoch {
            state.selection_pending = false;
        }
    }
}

fn percent_of(percent: f64, duration: f64) -> f64 {
    let percent = if percent.is_finite() { percent } else { 0.0 };
    percent.clamp(0.0, 100.0) / 100.0 * duration
}

impl fmt::Debug for PlayerStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlayerStore")
            .field("session_id", &self.shared.session_id)
            .field("subscribers", &self.shared.subscribers.len())
            .field("polling", &self.is_polling())
            .finish()
    }
}
