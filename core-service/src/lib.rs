//! Core service façade and bootstrap helpers.
//!
//! This crate wires host-provided bridge implementations (the audio
//! transport, and optionally a library scanner and an artwork resolver) into
//! one playback session. Hosts build a [`PlayerService`] once at startup and
//! pass it through their application context; the service owns the
//! [`PlayerStore`] and the event bus for that session.
//!
//! ```rust,no_run
//! # use std::sync::Arc;
//! # use bridge_traits::{TrackSource, TransportClient};
//! # async fn example(
//! #     transport: Arc<dyn TransportClient>,
//! #     scanner: Arc<dyn TrackSource>,
//! # ) -> core_service::Result<()> {
//! use core_service::PlayerService;
//!
//! let service = PlayerService::builder()
//!     .transport(transport)
//!     .track_source(scanner)
//!     .build()?;
//!
//! let found = service.load_library("/home/me/Music").await?;
//! if found > 0 {
//!     service.play_from_library(0).await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;

pub use error::{CoreError, Result};

pub use bridge_traits::{ArtworkResolver, ScannedTrack, TrackSource, TransportClient};
pub use core_playback::{
    format_time, Dispatch, PlaybackSnapshot, PlayerStore, Subscription, TickOutcome, Track,
};
pub use core_runtime::config::PlayerConfig;
pub use core_runtime::events::{EventBus, EventStream, PlayerEvent};

use core_playback::PlaybackError;
use core_runtime::logging::strip_path;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Thumbnail edge used when the caller has no preference.
pub const DEFAULT_COVER_SIZE: u32 = 128;

/// Aggregated handle to the bridge implementations a session uses.
#[derive(Clone)]
pub struct CoreDependencies {
    pub transport: Arc<dyn TransportClient>,
    pub track_source: Option<Arc<dyn TrackSource>>,
    pub artwork: Option<Arc<dyn ArtworkResolver>>,
}

impl CoreDependencies {
    /// Construct a dependency bundle with only the mandatory transport.
    pub fn new(transport: Arc<dyn TransportClient>) -> Self {
        Self {
            transport,
            track_source: None,
            artwork: None,
        }
    }
}

impl fmt::Debug for CoreDependencies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoreDependencies")
            .field("transport", &"TransportClient { ... }")
            .field("track_source", &self.track_source.is_some())
            .field("artwork", &self.artwork.is_some())
            .finish()
    }
}

/// Builder for [`PlayerService`].
#[derive(Default)]
pub struct PlayerServiceBuilder {
    transport: Option<Arc<dyn TransportClient>>,
    track_source: Option<Arc<dyn TrackSource>>,
    artwork: Option<Arc<dyn ArtworkResolver>>,
    config: Option<PlayerConfig>,
}

impl PlayerServiceBuilder {
    pub fn transport(mut self, transport: Arc<dyn TransportClient>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn track_source(mut self, source: Arc<dyn TrackSource>) -> Self {
        self.track_source = Some(source);
        self
    }

    pub fn artwork_resolver(mut self, resolver: Arc<dyn ArtworkResolver>) -> Self {
        self.artwork = Some(resolver);
        self
    }

    pub fn config(mut self, config: PlayerConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Fails with [`CoreError::CapabilityMissing`] without a transport, and
    /// with [`CoreError::Config`] for an invalid configuration.
    pub fn build(self) -> Result<PlayerService> {
        let transport = self.transport.ok_or_else(|| {
            CoreError::missing(
                "transport",
                "a TransportClient is required to control playback",
            )
        })?;

        let deps = CoreDependencies {
            transport,
            track_source: self.track_source,
            artwork: self.artwork,
        };
        PlayerService::new(deps, self.config.unwrap_or_default())
    }
}

/// Primary façade exposed to host applications: one playback session.
#[derive(Clone)]
pub struct PlayerService {
    deps: Arc<CoreDependencies>,
    store: PlayerStore,
    library: Arc<RwLock<Arc<Vec<Track>>>>,
}

impl PlayerService {
    pub fn builder() -> PlayerServiceBuilder {
        PlayerServiceBuilder::default()
    }

    /// Create a new service from the provided dependencies.
    pub fn new(deps: CoreDependencies, config: PlayerConfig) -> Result<Self> {
        config.validate()?;

        let events = EventBus::new(config.event_buffer_size);
        let store = PlayerStore::with_events(Arc::clone(&deps.transport), config, events)?;
        info!(
            session = %store.session_id(),
            library = deps.track_source.is_some(),
            artwork = deps.artwork.is_some(),
            "player service initialised"
        );

        Ok(Self {
            deps: Arc::new(deps),
            store,
            library: Arc::new(RwLock::new(Arc::new(Vec::new()))),
        })
    }

    /// Access the bridge dependencies being used by the service.
    pub fn dependencies(&self) -> Arc<CoreDependencies> {
        Arc::clone(&self.deps)
    }

    /// The playback store of this session.
    pub fn store(&self) -> &PlayerStore {
        &self.store
    }

    pub fn events(&self) -> &EventBus {
        self.store.events()
    }

    /// Subscribes to discrete playback events.
    pub fn event_stream(&self) -> EventStream {
        EventStream::new(self.store.events().subscribe())
    }

    // ------------------------------------------------------------------------
    // Library
    // ------------------------------------------------------------------------

    /// Scans `root` and keeps the result as the browsable library.
    ///
    /// An empty root clears the library without scanning. Entries the engine
    /// cannot play are skipped. On scan failure the previous library is kept.
    /// Returns the number of tracks now in the library.
    pub async fn load_library(&self, root: &str) -> Result<usize> {
        let root = root.trim();
        if root.is_empty() {
            debug!("no library root chosen; clearing library");
            *self.library.write() = Arc::new(Vec::new());
            return Ok(0);
        }

        let source = self.deps.track_source.as_ref().ok_or_else(|| {
            CoreError::missing("track_source", "a TrackSource is required to scan libraries")
        })?;

        let scanned = source.scan(root).await.map_err(|err| {
            warn!(root = strip_path(root), error = %err, "library scan failed");
            CoreError::from(err)
        })?;

        let total = scanned.len();
        let tracks: Vec<Track> = scanned
            .into_iter()
            .filter_map(|entry| match Track::try_from(entry) {
                Ok(track) => Some(track),
                Err(err) => {
                    warn!(error = %err, "skipping unplayable library entry");
                    None
                }
            })
            .collect();

        let count = tracks.len();
        *self.library.write() = Arc::new(tracks);
        info!(
            root = strip_path(root),
            tracks = count,
            skipped = total - count,
            "library loaded"
        );
        Ok(count)
    }

    /// The tracks of the last successful scan, in display order.
    pub fn library(&self) -> Arc<Vec<Track>> {
        Arc::clone(&self.library.read())
    }

    /// Queues the whole library and starts at `index`.
    pub async fn play_from_library(&self, index: usize) -> Result<Dispatch> {
        let library = self.library();
        if index >= library.len() {
            return Err(PlaybackError::IndexOutOfRange {
                index,
                len: library.len(),
            }
            .into());
        }

        let start_at = i64::try_from(index)
            .map_err(|_| PlaybackError::Internal(format!("index {index} does not fit i64")))?;
        Ok(self
            .store
            .set_queue_and_play(library.as_ref().clone(), start_at)
            .await)
    }

    // ------------------------------------------------------------------------
    // Artwork
    // ------------------------------------------------------------------------

    /// Cover image for `track`: a cached thumbnail if the resolver has one,
    /// otherwise the embedded art.
    ///
    /// Resolver failures are logged and treated as "no cover". Tracks scanned
    /// without art are not looked up at all.
    pub async fn cover_for(&self, track: &Track, size: u32) -> Option<String> {
        if !track.has_art {
            return None;
        }
        let resolver = self.deps.artwork.as_ref()?;

        match resolver.thumbnail(&track.path, size).await {
            Ok(Some(thumbnail)) => return Some(thumbnail),
            Ok(None) => {}
            Err(err) => debug!(
                path = strip_path(&track.path),
                error = %err,
                "thumbnail lookup failed"
            ),
        }

        match resolver.embedded(&track.path).await {
            Ok(found) => found,
            Err(err) => {
                debug!(
                    path = strip_path(&track.path),
                    error = %err,
                    "embedded art lookup failed"
                );
                None
            }
        }
    }

    /// Stops polling and drops every snapshot subscriber of the session.
    pub fn dispose(&self) {
        self.store.dispose();
    }
}

impl fmt::Debug for PlayerService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlayerService")
            .field("deps", &self.deps)
            .field("store", &self.store)
            .field("library_len", &self.library.read().len())
            .finish()
    }
}
