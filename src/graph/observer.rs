//! Per-entry change notification.
//!
//! Every [`Entry`] owns an [`Observers`] channel. Subscribing returns a
//! [`Subscription`] token; there is no ambient registry.
//!
//! Notifications for one entry are strictly serialized. A notification raised
//! while another is being delivered (from an observer, or from a fetch
//! completing on another thread) is queued and delivered by the thread already
//! dispatching, after the current round. Observers removed mid-round are not
//! called again; the others still are.

use super::{Entry, lock};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, Weak};

/// Change callback; receives the entry whose state changed.
pub type Observer = Arc<dyn Fn(&Entry) + Send + Sync>;

#[derive(Default)]
struct Registry {
    next: u64,
    observers: BTreeMap<u64, Observer>,
}

#[derive(Default)]
struct Dispatch {
    pending: usize,
    running: bool,
}

/// Observer registry with serialized dispatch.
#[derive(Default)]
pub struct Observers {
    registry: Mutex<Registry>,
    dispatch: Mutex<Dispatch>,
}

impl Observers {
    pub(crate) fn subscribe(self: &Arc<Self>, observer: Observer) -> Subscription {
        let mut registry = lock(&self.registry);

        let id = registry.next;
        registry.next += 1;
        registry.observers.insert(id, observer);

        Subscription {
            observers: Arc::downgrade(self),
            id,
        }
    }

    fn unsubscribe(&self, id: u64) -> bool {
        lock(&self.registry).observers.remove(&id).is_some()
    }

    fn observer(&self, id: u64) -> Option<Observer> {
        lock(&self.registry).observers.get(&id).cloned()
    }

    /// Number of registered observers.
    pub fn len(&self) -> usize {
        lock(&self.registry).observers.len()
    }

    /// `true` if nobody is observing.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn notify(&self, entry: &Entry) {
        {
            let mut dispatch = lock(&self.dispatch);
            dispatch.pending += 1;
            if dispatch.running {
                return;
            }
            dispatch.running = true;
        }

        let mut running = Running {
            dispatch: &self.dispatch,
            armed: true,
        };

        loop {
            {
                let mut dispatch = lock(&self.dispatch);
                if dispatch.pending == 0 {
                    dispatch.running = false;
                    running.armed = false;
                    return;
                }
                dispatch.pending -= 1;
            }

            let ids: Vec<u64> = lock(&self.registry).observers.keys().copied().collect();

            tracing::trace!("notifying {} observer(s) of {}", ids.len(), entry.key());

            for id in ids {
                if let Some(observer) = self.observer(id) {
                    observer(entry);
                }
            }
        }
    }
}

/// Resets the dispatch flag if an observer panics mid-round.
struct Running<'a> {
    dispatch: &'a Mutex<Dispatch>,
    armed: bool,
}

impl Drop for Running<'_> {
    fn drop(&mut self) {
        if self.armed {
            let mut dispatch = lock(self.dispatch);
            dispatch.running = false;
            dispatch.pending = 0;
        }
    }
}

/// Capability to remove one observer.
///
/// Dropping the token leaves the observer registered; call
/// [`unsubscribe`](Subscription::unsubscribe) to remove it.
pub struct Subscription {
    observers: Weak<Observers>,
    id: u64,
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

impl Subscription {
    /// Remove the observer; returns `false` if it was already removed.
    pub fn unsubscribe(&self) -> bool {
        self.observers
            .upgrade()
            .is_some_and(|observers| observers.unsubscribe(self.id))
    }
}
