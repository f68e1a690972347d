//! # Poll Loop
//!
//! Periodic reconciliation of local state with the transport.
//!
//! The transport pushes nothing, so a background task asks it for the
//! position every `poll_interval` and folds the answer into the store:
//!
//! - buffering clears once the position moved forward by more than
//!   `progress_epsilon_secs` since the last reading,
//! - ticks after a track load also ask for the duration until the transport
//!   reports one,
//! - a finished track advances the queue,
//! - failed queries are logged and retried on the next tick.
//!
//! Ticks never touch `position` while a drag session is active, and never
//! write anything but position, buffering and duration.

use crate::error::PlaybackError;
use crate::outcome::TickOutcome;
use crate::store::{PlayerStore, Shared};
use bridge_traits::transport::TransportOperation;
use core_runtime::events::PlayerEvent;
use std::sync::Weak;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace};

/// Running poll task. Dropping the handle cancels the task.
pub(crate) struct PollHandle {
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl PollHandle {
    /// Spawns the loop on the current tokio runtime, if there is one.
    pub(crate) fn spawn(shared: Weak<Shared>, period: Duration) -> Option<Self> {
        let runtime = tokio::runtime::Handle::try_current().ok()?;
        let token = CancellationToken::new();
        let task = runtime.spawn(run(shared, period, token.clone()));
        Some(Self { token, task })
    }

    pub(crate) fn cancel(&self) {
        self.token.cancel();
    }

    pub(crate) fn is_running(&self) -> bool {
        !self.token.is_cancelled() && !self.task.is_finished()
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

async fn run(shared: Weak<Shared>, period: Duration, token: CancellationToken) {
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    debug!(period_ms = period.as_millis() as u64, "poll loop started");

    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            _ = ticker.tick() => {}
        }

        // The store is gone once every handle was dropped.
        let Some(shared) = shared.upgrade() else {
            break;
        };
        let store = PlayerStore::from_shared(shared);

        let tick = tokio::select! {
            _ = token.cancelled() => break,
            tick = store.reconcile() => tick,
        };
        // A track change that has begun runs to completion, even when the
        // loop is cancelled meanwhile.
        let outcome = store.finish_tick(tick).await;
        trace!(?outcome, "poll tick");
    }

    debug!("poll loop stopped");
}

/// Result of the reconciliation half of a tick.
enum Tick {
    Done(TickOutcome),
    TrackEnded,
}

struct Reading {
    position: f64,
    buffering_cleared: bool,
    ended: bool,
}

impl PlayerStore {
    /// Runs one reconciliation pass.
    ///
    /// The poll loop calls this every interval; hosts that own their own
    /// timer (and tests) can call it directly.
    pub async fn poll_once(&self) -> TickOutcome {
        let tick = self.reconcile().await;
        self.finish_tick(tick).await
    }

    async fn finish_tick(&self, tick: Tick) -> TickOutcome {
        match tick {
            Tick::Done(outcome) => outcome,
            Tick::TrackEnded => {
                info!(session = %self.shared.session_id, "track finished; advancing");
                TickOutcome::Advanced(self.next().await)
            }
        }
    }

    async fn reconcile(&self) -> Tick {
        let (epoch, fetch_duration) = {
            let state = self.shared.state.lock();
            if !state.is_playing
                || state.selection_pending
                || state.drag.is_active()
                || state.duration <= 0.0
            {
                return Tick::Done(TickOutcome::Skipped);
            }
            (state.track_epoch, state.duration_pending)
        };

        let observed = match self.shared.transport.get_position().await {
            Ok(position) if position.is_finite() => position.max(0.0),
            Ok(value) => {
                return Tick::Done(self.tick_failed(PlaybackError::InvalidReading {
                    operation: TransportOperation::GetPosition,
                    value,
                }))
            }
            Err(source) => {
                return Tick::Done(self.tick_failed(PlaybackError::transport(
                    TransportOperation::GetPosition,
                    source,
                )))
            }
        };

        // Position is reconciled whatever happens to the duration query; an
        // unanswered duration stays pending for the next tick.
        let reported = if fetch_duration {
            self.query_duration().await
        } else {
            None
        };

        let epsilon = self.shared.config.progress_epsilon_secs;
        let reading = self.update_if(|state| {
            // A drag began, or another track loaded, while the query was out.
            if state.drag.is_active() || state.track_epoch != epoch {
                return None;
            }

            if let Some(duration) = reported {
                state.duration = duration;
                state.duration_estimated = false;
                state.duration_pending = false;
            }

            let buffering_cleared =
                state.is_buffering && observed > state.last_reported + epsilon;
            if buffering_cleared {
                state.is_buffering = false;
            }
            state.last_reported = observed;
            state.position = observed.min(state.duration);

            let ended = state.is_playing
                && !state.duration_estimated
                && state.duration > 0.0
                && state.position >= state.duration;

            Some(Reading {
                position: state.position,
                buffering_cleared,
                ended,
            })
        });

        let Some(reading) = reading else {
            return Tick::Done(TickOutcome::Skipped);
        };

        if let Some(duration) = reported {
            debug!(session = %self.shared.session_id, duration, "duration reported");
        }
        if reading.buffering_cleared {
            debug!(
                session = %self.shared.session_id,
                position = reading.position,
                "progress observed; buffering cleared"
            );
            self.emit(PlayerEvent::BufferingChanged { buffering: false });
        }

        if reading.ended {
            return Tick::TrackEnded;
        }

        Tick::Done(TickOutcome::Reconciled {
            position: reading.position,
            buffering_cleared: reading.buffering_cleared,
        })
    }

    /// Asks the transport for the track length. `None` when it has no usable
    /// answer yet.
    async fn query_duration(&self) -> Option<f64> {
        match self.shared.transport.get_duration().await {
            Ok(reported) if reported.is_finite() && reported > 0.0 => Some(reported),
            Ok(_) => {
                trace!("transport has no duration yet");
                None
            }
            Err(source) => {
                self.report_failure(&PlaybackError::transport(
                    TransportOperation::GetDuration,
                    source,
                ));
                None
            }
        }
    }

    fn tick_failed(&self, err: PlaybackError) -> TickOutcome {
        self.report_failure(&err);
        match err.operation() {
            Some(operation) => TickOutcome::TransportFailed { operation },
            None => TickOutcome::Skipped,
        }
    }
}
