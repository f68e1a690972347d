//! # Playback Store Demo
//!
//! Drives a `PlayerStore` against an in-process simulated engine that
//! starts moving a little after each command, the way a real engine spends
//! time buffering.
//!
//! Run with: `cargo run --example playback_demo --package core-playback`

use bridge_traits::error::Result;
use bridge_traits::transport::TransportClient;
use core_playback::{format_time, PlayerStore, Track};
use core_runtime::config::PlayerConfig;
use core_runtime::logging::{init_logging, LoggingConfig};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

// ============================================================================
// Simulated engine
// ============================================================================

const STARTUP_DELAY: Duration = Duration::from_millis(400);

struct Engine {
    durations: Vec<f64>,
    index: usize,
    /// Position when the clock was last anchored.
    base: f64,
    /// Playback clock start; `None` while paused.
    started: Option<Instant>,
}

impl Engine {
    fn position(&self) -> f64 {
        let elapsed = self.started.map_or(0.0, |start| {
            Instant::now()
                .saturating_duration_since(start + STARTUP_DELAY)
                .as_secs_f64()
        });
        (self.base + elapsed).min(self.durations.get(self.index).copied().unwrap_or(0.0))
    }

    fn anchor(&mut self, position: f64, playing: bool) {
        self.base = position;
        self.started = playing.then(Instant::now);
    }
}

struct SimulatedTransport {
    engine: Mutex<Engine>,
}

impl SimulatedTransport {
    fn new(tracks: &[Track]) -> Self {
        Self {
            engine: Mutex::new(Engine {
                durations: tracks.iter().map(|t| t.duration_secs).collect(),
                index: 0,
                base: 0.0,
                started: None,
            }),
        }
    }
}

#[async_trait::async_trait]
impl TransportClient for SimulatedTransport {
    async fn play_selection(&self, _paths: Vec<String>, start_index: usize) -> Result<()> {
        let mut engine = self.engine.lock();
        engine.index = start_index;
        engine.anchor(0.0, true);
        Ok(())
    }

    async fn play(&self) -> Result<()> {
        let mut engine = self.engine.lock();
        let position = engine.position();
        engine.anchor(position, true);
        Ok(())
    }

    async fn pause(&self) -> Result<()> {
        let mut engine = self.engine.lock();
        let position = engine.position();
        engine.anchor(position, false);
        Ok(())
    }

    async fn stop(&self) -> Result<()> {
        self.engine.lock().anchor(0.0, false);
        Ok(())
    }

    async fn seek_to(&self, position_secs: f64) -> Result<()> {
        let mut engine = self.engine.lock();
        let playing = engine.started.is_some();
        engine.anchor(position_secs, playing);
        Ok(())
    }

    async fn set_volume(&self, _linear: f64) -> Result<()> {
        Ok(())
    }

    async fn get_position(&self) -> Result<f64> {
        Ok(self.engine.lock().position())
    }

    async fn get_duration(&self) -> Result<f64> {
        let engine = self.engine.lock();
        Ok(engine.durations.get(engine.index).copied().unwrap_or(0.0))
    }
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default())?;

    let tracks = vec![
        Track::new("/music/intro.flac", "Intro", "Demo Band").with_duration(3.0),
        Track::new("/music/second.flac", "Second", "Demo Band").with_duration(4.0),
    ];
    let transport = Arc::new(SimulatedTransport::new(&tracks));

    let config = PlayerConfig::builder().poll_interval_ms(200).build()?;
    let store = PlayerStore::new(transport, config)?;

    let subscription = store.subscribe(|snap| {
        println!(
            "{:<10} {} / {}  playing={} buffering={}",
            snap.title(),
            format_time(snap.display_position()),
            format_time(snap.duration),
            snap.is_playing,
            snap.is_buffering,
        );
    });

    store.set_queue_and_play(tracks, 0).await;
    tokio::time::sleep(Duration::from_secs(2)).await;

    println!("-- scrubbing to 50%");
    store.begin_drag();
    store.drag_to_percent(50.0);
    tokio::time::sleep(Duration::from_millis(500)).await;
    store.commit_drag().await;

    println!("-- letting the queue advance");
    tokio::time::sleep(Duration::from_secs(3)).await;

    store.toggle_mute().await;
    store.stop().await;

    subscription.unsubscribe();
    store.dispose();
    Ok(())
}
