//! Snapshot listeners for the view layer.

use crate::types::PlaybackSnapshot;
use parking_lot::Mutex;
use std::sync::{Arc, Weak};

/// Callback receiving every published snapshot.
pub type Listener = Arc<dyn Fn(&PlaybackSnapshot) + Send + Sync>;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(u64, Listener)>,
    delivered_revision: Option<u64>,
}

/// Registry of snapshot listeners.
///
/// Listeners are called outside the registry lock, so a listener may read
/// the store or drop its own subscription.
#[derive(Clone, Default)]
pub(crate) struct SubscriberRegistry {
    inner: Arc<Mutex<Listeners>>,
}

impl SubscriberRegistry {
    pub(crate) fn add(&self, listener: Listener) -> Subscription {
        let mut inner = self.inner.lock();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.entries.push((id, listener));
        Subscription {
            id,
            registry: Arc::downgrade(&self.inner),
        }
    }

    /// Delivers `snapshot` to every listener.
    ///
    /// A snapshot older than the last delivered one is dropped; it can only
    /// appear when two tasks race to publish after releasing the state lock.
    pub(crate) fn publish(&self, snapshot: &PlaybackSnapshot) {
        let listeners: Vec<Listener> = {
            let mut inner = self.inner.lock();
            if inner
                .delivered_revision
                .is_some_and(|delivered| snapshot.revision < delivered)
            {
                return;
            }
            inner.delivered_revision = Some(snapshot.revision);
            inner.entries.iter().map(|(_, l)| Arc::clone(l)).collect()
        };

        for listener in listeners {
            listener(snapshot);
        }
    }

    pub(crate) fn clear(&self) {
        self.inner.lock().entries.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }
}

/// Handle returned by [`PlayerStore::subscribe`](crate::PlayerStore::subscribe).
///
/// Dropping the handle does not unsubscribe; call [`unsubscribe`](Self::unsubscribe).
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    registry: Weak<Mutex<Listeners>>,
}

impl Subscription {
    /// Removes the listener. Returns `true` the first time it actually
    /// removed something; later calls and calls after the store was
    /// disposed are no-ops.
    pub fn unsubscribe(&self) -> bool {
        let Some(registry) = self.registry.upgrade() else {
            return false;
        };
        let mut inner = registry.lock();
        let before = inner.entries.len();
        inner.entries.retain(|(id, _)| *id != self.id);
        inner.entries.len() != before
    }
}
