//! Observer registry and fan-out for session state changes.
//!
//! The registry keys observers by a monotonically increasing id in an
//! ordered map: iteration order is registration order, and removal is
//! a cheap keyed delete instead of a scan. Every broadcast pass works
//! against a snapshot of the registry taken up front, so an observer
//! that unsubscribes itself — or any other observer — mid-delivery
//! cannot corrupt the pass in flight.

use std::collections::BTreeMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, Mutex, PoisonError, Weak};

use crate::AuthState;

/// The observer callback type. Called synchronously, on the task that
/// performed the transition, never concurrently with itself.
pub(crate) type WatchFn = dyn Fn(&AuthState) + Send + Sync;

/// Ordered collection of registered observers.
///
/// Ids are handed out monotonically, so `BTreeMap` iteration visits
/// observers in registration order — the delivery order contract.
pub(crate) struct WatcherRegistry {
    next_id: u64,
    watchers: BTreeMap<u64, Arc<WatchFn>>,
}

impl WatcherRegistry {
    pub(crate) fn new() -> Self {
        Self {
            next_id: 1,
            watchers: BTreeMap::new(),
        }
    }

    /// Adds an observer and returns its registration id.
    pub(crate) fn register(&mut self, watcher: Arc<WatchFn>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.watchers.insert(id, watcher);
        id
    }

    /// Removes an observer by id. Removing an id that was already
    /// removed is a no-op; returns whether anything was removed.
    pub(crate) fn remove(&mut self, id: u64) -> bool {
        self.watchers.remove(&id).is_some()
    }

    /// A point-in-time copy of all observers, in registration order.
    pub(crate) fn snapshot(&self) -> Vec<(u64, Arc<WatchFn>)> {
        self.watchers
            .iter()
            .map(|(id, w)| (*id, Arc::clone(w)))
            .collect()
    }

    /// Number of registered observers.
    pub(crate) fn len(&self) -> usize {
        self.watchers.len()
    }
}

/// Locks a registry mutex, recovering from poisoning.
///
/// Observer callbacks run strictly outside this lock, so a panic
/// elsewhere can't have left the map mid-mutation — the inner value is
/// always consistent and safe to reclaim.
pub(crate) fn lock(
    registry: &Mutex<WatcherRegistry>,
) -> std::sync::MutexGuard<'_, WatcherRegistry> {
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Delivers one state to every observer registered at the start of the
/// pass, in registration order, isolating panics per observer.
pub(crate) fn broadcast(registry: &Mutex<WatcherRegistry>, state: &AuthState) {
    let snapshot = lock(registry).snapshot();
    for (id, watcher) in snapshot {
        deliver(id, watcher.as_ref(), state);
    }
}

/// Invokes a single observer. A panicking observer is caught and
/// logged; it must not prevent delivery to the observers after it.
pub(crate) fn deliver(id: u64, watcher: &WatchFn, state: &AuthState) {
    if catch_unwind(AssertUnwindSafe(|| watcher(state))).is_err() {
        tracing::warn!(
            watcher = id,
            "observer panicked during delivery, continuing with remaining observers"
        );
    }
}

/// Handle returned by [`AuthClient::subscribe`](crate::AuthClient::subscribe).
///
/// Calling [`unsubscribe`](Subscription::unsubscribe) removes the
/// observer; calling it again (or after the client is gone) is a
/// harmless no-op. Dropping the handle does NOT unsubscribe — the
/// handle is a key, not a guard, so an observer stays registered for
/// the life of the client unless explicitly removed.
pub struct Subscription {
    id: u64,
    registry: Weak<Mutex<WatcherRegistry>>,
}

impl Subscription {
    pub(crate) fn new(id: u64, registry: Weak<Mutex<WatcherRegistry>>) -> Self {
        Self { id, registry }
    }

    /// Removes the observer from the registry. Idempotent.
    pub fn unsubscribe(&self) {
        let Some(registry) = self.registry.upgrade() else {
            // The client (and with it every observer) is already gone.
            return;
        };
        if lock(&registry).remove(self.id) {
            tracing::debug!(watcher = self.id, "observer unsubscribed");
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
