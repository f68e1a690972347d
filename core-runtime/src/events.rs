//! # Event Bus System
//!
//! Broadcasts playback events using `tokio::sync::broadcast`.
//!
//! ## Overview
//!
//! The playback store notifies its view-layer subscribers with full state
//! snapshots. Some observers only care about discrete transitions: a media
//! session integration wants "track changed", a diagnostics panel wants
//! "transport call failed". Those observers subscribe here instead.
//!
//! ```text
//! ┌─────────────┐     emit      ┌───────────┐     subscribe    ┌────────────┐
//! │ PlayerStore ├──────────────>│ EventBus  ├─────────────────>│ Subscriber │
//! └─────────────┘               │ (broadcast│                  └────────────┘
//!                               │  channel) ├─────────────────>┌────────────┐
//!                               └───────────┘                  │ Subscriber │
//!                                                              └────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use core_runtime::events::{EventBus, PlayerEvent};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let bus = EventBus::new(16);
//! let mut rx = bus.subscribe();
//!
//! bus.emit(PlayerEvent::PlaybackToggled { playing: true }).ok();
//! assert_eq!(rx.recv().await.unwrap(), PlayerEvent::PlaybackToggled { playing: true });
//! # }
//! ```
//!
//! ## Error Handling
//!
//! - **`RecvError::Lagged(n)`**: the subscriber missed `n` events. Non-fatal.
//! - **`RecvError::Closed`**: every sender was dropped; the store is gone.
//!
//! Emitting with no subscribers returns `Err`; publishers in the core ignore it.

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::broadcast;

pub use tokio::sync::broadcast::error::{RecvError, SendError};
pub use tokio::sync::broadcast::Receiver;

/// Default buffer size for the event bus channel.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

/// Discrete transitions published by the playback engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum PlayerEvent {
    /// A new track became current (queue replaced, next/prev, auto-advance).
    TrackChanged {
        /// Index of the track within the queue.
        index: usize,
        /// Path of the track.
        path: String,
    },
    /// Playing flag flipped.
    PlaybackToggled {
        playing: bool,
    },
    /// Buffering entered or cleared.
    BufferingChanged {
        buffering: bool,
    },
    /// An explicit seek was issued.
    Seeked {
        position_secs: f64,
    },
    /// Volume or mute changed.
    VolumeChanged {
        /// Stored linear level, unchanged by mute.
        volume: f64,
        muted: bool,
    },
    /// Navigation was requested on an empty queue; playback paused.
    QueueEnded,
    /// A transport call was rejected. Local state was kept.
    TransportFailed {
        /// Name of the transport call.
        operation: String,
        message: String,
    },
}

impl PlayerEvent {
    /// Returns a human-readable description of the event.
    pub fn description(&self) -> &str {
        match self {
            PlayerEvent::TrackChanged { .. } => "Track changed",
            PlayerEvent::PlaybackToggled { playing: true } => "Playback started",
            PlayerEvent::PlaybackToggled { playing: false } => "Playback paused",
            PlayerEvent::BufferingChanged { buffering: true } => "Buffering",
            PlayerEvent::BufferingChanged { buffering: false } => "Buffering cleared",
            PlayerEvent::Seeked { .. } => "Seeked",
            PlayerEvent::VolumeChanged { .. } => "Volume changed",
            PlayerEvent::QueueEnded => "Queue empty, playback paused",
            PlayerEvent::TransportFailed { .. } => "Transport call failed",
        }
    }

    /// Returns the severity level of the event.
    pub fn severity(&self) -> EventSeverity {
        match self {
            PlayerEvent::TransportFailed { .. } => EventSeverity::Warning,
            PlayerEvent::TrackChanged { .. } | PlayerEvent::QueueEnded => EventSeverity::Info,
            _ => EventSeverity::Debug,
        }
    }
}

/// Event severity levels for filtering and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventSeverity {
    Debug,
    Info,
    Warning,
    Error,
}

// ============================================================================
// Event Bus
// ============================================================================

/// Central event bus for publishing and subscribing to player events.
///
/// Cloning the bus yields another sender on the same channel.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<PlayerEvent>,
}

impl EventBus {
    /// Creates a new event bus with the specified buffer size.
    ///
    /// Subscribers that fall behind by more than `capacity` events receive
    /// `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of subscribers that received the event, or an
    /// error if there are none.
    pub fn emit(&self, event: PlayerEvent) -> Result<usize, SendError<PlayerEvent>> {
        self.sender.send(event)
    }

    /// Creates a new subscriber. Past events are not replayed.
    pub fn subscribe(&self) -> Receiver<PlayerEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

// ============================================================================
// Event Stream Wrapper
// ============================================================================

type EventFilter = Box<dyn Fn(&PlayerEvent) -> bool + Send + Sync>;

/// A wrapper around `broadcast::Receiver` with optional filtering.
///
/// ```rust
/// use core_runtime::events::{EventBus, EventStream, PlayerEvent};
///
/// let bus = EventBus::new(16);
/// let failures = EventStream::new(bus.subscribe())
///     .filter(|event| matches!(event, PlayerEvent::TransportFailed { .. }));
/// ```
pub struct EventStream {
    receiver: Receiver<PlayerEvent>,
    filter: Option<EventFilter>,
}

impl EventStream {
    pub fn new(receiver: Receiver<PlayerEvent>) -> Self {
        Self {
            receiver,
            filter: None,
        }
    }

    /// Only events matching `predicate` will be returned.
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&PlayerEvent) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Box::new(predicate));
        self
    }

    fn accepts(&self, event: &PlayerEvent) -> bool {
        self.filter.as_ref().map_or(true, |filter| filter(event))
    }

    /// Receives the next event that passes the filter.
    ///
    /// # Errors
    ///
    /// `RecvError::Lagged(n)` if the subscriber fell behind by `n` events,
    /// `RecvError::Closed` once all senders are dropped.
    pub async fn recv(&mut self) -> Result<PlayerEvent, RecvError> {
        loop {
            let event = self.receiver.recv().await?;
            if self.accepts(&event) {
                return Ok(event);
            }
        }
    }

    /// Attempts to receive an event without waiting.
    ///
    /// Returns `None` if no matching event is currently queued.
    pub fn try_recv(&mut self) -> Option<Result<PlayerEvent, RecvError>> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    if self.accepts(&event) {
                        return Some(Ok(event));
                    }
                }
                Err(broadcast::error::TryRecvError::Empty) => return None,
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    return Some(Err(RecvError::Lagged(n)))
                }
                Err(broadcast::error::TryRecvError::Closed) => return Some(Err(RecvError::Closed)),
            }
        }
    }
}

impl fmt::Debug for EventStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("has_filter", &self.filter.is_some())
            .finish()
    }
}
