//! Cached fetch lifecycle.
//!
//! # State Transitions
//!
//! ```text
//!              get()                    fetch ok
//! Unresolved ────────▶ Pending ──────────────────────▶ Resolved(model ⊕ response)
//!     ▲                 │   │        fetch failed
//!     └──── cancel() ───┘   └────────────────────────▶ Failed(error)
//! ```
//!
//! - `get()` on an unresolved entry starts exactly one fetch; on any other
//!   state it is a no-op. Resolved and failed entries never re-fetch: a failed
//!   key stays failed until it is evicted from its [`Graph`](super::Graph) or
//!   a differently shaped query is used.
//! - `cancel()` aborts a pending fetch and returns the entry to `Unresolved`;
//!   a completion racing with the cancellation is discarded.
//! - Observers are notified after every transition, including local patches.
//!
//! Fetches run as tokio tasks: `get()` never blocks and returns immediately
//! with the entry pending; completion is reported through observers.

use super::observer::{Observer, Observers, Subscription};
use super::probe::Probe;
use super::transport::{Transport, TransportError};
use super::lock;
use crate::core::GraphError;
use crate::value::{Frozen, freeze, merge};
use serde::de::DeserializeOwned;
use serde_json::Value as Json;
use std::fmt;
use std::sync::{Arc, Mutex};
use tokio::runtime::Handle;
use tokio::task::AbortHandle;

/// Observable state discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// No fetch started yet (or the last one was cancelled)
    Unresolved,
    /// A fetch is in flight
    Pending,
    /// The fetch succeeded
    Resolved,
    /// The fetch failed
    Failed,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unresolved => "unresolved",
            Self::Pending => "pending",
            Self::Resolved => "resolved",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

enum State {
    Unresolved,
    Pending { abort: AbortHandle, generation: u64 },
    Resolved(Frozen),
    Failed(Arc<TransportError>),
}

#[derive(Clone)]
enum Snapshot {
    Unresolved,
    Pending,
    Resolved(Frozen),
    Failed(Arc<TransportError>),
}

struct Inner {
    state: State,
    generation: u64,
}

/// A single cached fetch and its observers.
pub struct Entry {
    key: String,
    model: Frozen,
    transport: Arc<dyn Transport>,
    inner: Mutex<Inner>,
    observers: Arc<Observers>,
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("key", &self.key)
            .field("status", &self.state())
            .finish_non_exhaustive()
    }
}

impl Entry {
    pub(crate) fn new(key: String, model: Frozen, transport: Arc<dyn Transport>) -> Self {
        Self {
            key,
            model,
            transport,
            inner: Mutex::new(Inner {
                state: State::Unresolved,
                generation: 0,
            }),
            observers: Arc::new(Observers::default()),
        }
    }

    /// Canonical cache key, also the URL fetched.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Frozen request model.
    pub fn model(&self) -> &Frozen {
        &self.model
    }

    /// Current state discriminant.
    pub fn state(&self) -> Status {
        match lock(&self.inner).state {
            State::Unresolved => Status::Unresolved,
            State::Pending { .. } => Status::Pending,
            State::Resolved(_) => Status::Resolved,
            State::Failed(_) => Status::Failed,
        }
    }

    /// Resolved value, if any.
    pub fn value(&self) -> Option<Frozen> {
        match self.snapshot() {
            Snapshot::Resolved(value) => Some(value),
            _ => None,
        }
    }

    /// Failure, if any.
    pub fn error(&self) -> Option<Arc<TransportError>> {
        match self.snapshot() {
            Snapshot::Failed(error) => Some(error),
            _ => None,
        }
    }

    /// Start fetching if unresolved; no-op otherwise.
    ///
    /// Outside a tokio runtime nothing can be spawned: the entry stays
    /// unresolved and the next `get()` from inside a runtime fetches.
    pub fn get(self: &Arc<Self>) -> &Arc<Self> {
        let mut inner = lock(&self.inner);

        if !matches!(inner.state, State::Unresolved) {
            return self;
        }

        let Ok(runtime) = Handle::try_current() else {
            tracing::warn!("cannot fetch {} outside of a tokio runtime", self.key);
            return self;
        };

        inner.generation += 1;
        let generation = inner.generation;

        tracing::debug!("fetching {}", self.key);

        let fetch = self.transport.fetch(&self.key);
        let entry = Arc::clone(self);

        let task = runtime.spawn(async move {
            let outcome = fetch.await;
            entry.complete(generation, outcome);
        });

        inner.state = State::Pending {
            abort: task.abort_handle(),
            generation,
        };
        drop(inner);

        self.notify();
        self
    }

    /// Abort a pending fetch and return to unresolved.
    ///
    /// Returns `false` (and changes nothing) if the entry was not pending.
    pub fn cancel(&self) -> bool {
        let mut inner = lock(&self.inner);

        let State::Pending { abort, .. } = &inner.state else {
            return false;
        };

        abort.abort();
        inner.state = State::Unresolved;
        drop(inner);

        tracing::debug!("cancelled fetch of {}", self.key);

        self.notify();
        true
    }

    /// Overlay `delta` on the resolved value and notify observers.
    ///
    /// Only resolved entries accept patches, and `delta` must be a JSON
    /// object; top-level fields of `delta` replace those of the value.
    pub fn patch(&self, delta: Json) -> Result<(), GraphError> {
        let mut inner = lock(&self.inner);

        let State::Resolved(value) = &inner.state else {
            let status = match inner.state {
                State::Unresolved => Status::Unresolved,
                State::Pending { .. } => Status::Pending,
                _ => Status::Failed,
            };

            return Err(GraphError::UnpatchableEntry {
                key: self.key.clone(),
                state: status.to_string(),
            });
        };

        let Json::Object(fields) = delta else {
            return Err(GraphError::UnpatchableEntry {
                key: self.key.clone(),
                state: "resolved (delta is not an object)".to_string(),
            });
        };

        inner.state = State::Resolved(freeze(merge(value, fields)));
        drop(inner);

        self.notify();
        Ok(())
    }

    /// Dispatch on the current state; see [`Probe`].
    pub fn probe<R>(&self, probe: Probe<'_, R>) -> Option<R> {
        match self.snapshot() {
            Snapshot::Unresolved => probe.unresolved(&self.model),
            Snapshot::Pending => probe.pending(&self.model),
            Snapshot::Resolved(value) => probe.resolved(&value, &self.model),
            Snapshot::Failed(error) => probe.failed(&error, &self.model),
        }
    }

    /// Fetch if needed, then project the resolved value.
    ///
    /// `None` while unresolved, pending or failed.
    pub fn then<R>(self: &Arc<Self>, f: impl FnOnce(&Json) -> R) -> Option<R> {
        self.get().probe(Probe::new().on_value(|value, _| Some(f(value))))
    }

    /// Fetch if needed, then project the resolved value, or the model while
    /// no value is available.
    pub fn data<R>(self: &Arc<Self>, f: impl Fn(&Json) -> R) -> R {
        let project = &f;

        self.get()
            .probe(
                Probe::new()
                    .on_value(move |value, _| Some(project(value)))
                    .on_other(move |model| Some(project(model))),
            )
            .unwrap_or_else(|| f(&self.model))
    }

    /// [`data`](Self::data) deserialized into `T`, falling back to the model
    /// if the value does not fit `T`.
    pub fn data_as<T: DeserializeOwned + Default>(self: &Arc<Self>) -> T {
        self.data(|json| serde_json::from_value::<T>(json.clone()))
            .or_else(|e| {
                tracing::warn!("unexpected shape for {}: {}", self.key, e);
                serde_json::from_value::<T>(Json::clone(&self.model))
            })
            .unwrap_or_default()
    }

    /// Register `callback` for every state transition.
    pub fn observe(&self, callback: impl Fn(&Entry) + Send + Sync + 'static) -> Subscription {
        let observer: Observer = Arc::new(callback);
        self.observers.subscribe(observer)
    }

    /// Number of registered observers.
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Fetch if needed and wait until the entry settles.
    ///
    /// Returns the resolved value, or the failure as [`GraphError::Transport`].
    /// A cancellation while waiting is reported as [`TransportError::Aborted`].
    pub async fn settle(self: &Arc<Self>) -> Result<Frozen, GraphError> {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let subscription = self.observe(move |_| {
            let _ = tx.send(());
        });

        self.get();

        let outcome = loop {
            match self.snapshot() {
                Snapshot::Resolved(value) => break Ok(value),
                Snapshot::Failed(error) => break Err(GraphError::Transport(TransportError::clone(&error))),
                Snapshot::Unresolved => {
                    break Err(GraphError::Transport(TransportError::Aborted {
                        url: self.key.clone(),
                    }));
                }
                Snapshot::Pending => {
                    if rx.recv().await.is_none() {
                        break Err(GraphError::Transport(TransportError::Aborted {
                            url: self.key.clone(),
                        }));
                    }
                }
            }
        };

        subscription.unsubscribe();
        outcome
    }

    fn snapshot(&self) -> Snapshot {
        match &lock(&self.inner).state {
            State::Unresolved => Snapshot::Unresolved,
            State::Pending { .. } => Snapshot::Pending,
            State::Resolved(value) => Snapshot::Resolved(Frozen::clone(value)),
            State::Failed(error) => Snapshot::Failed(Arc::clone(error)),
        }
    }

    fn complete(&self, generation: u64, outcome: Result<Json, TransportError>) {
        let mut inner = lock(&self.inner);

        match inner.state {
            State::Pending { generation: current, .. } if current == generation => {}
            _ => {
                tracing::trace!("discarding stale completion of {}", self.key);
                return;
            }
        }

        inner.state = match outcome {
            Ok(Json::Object(fields)) => {
                tracing::debug!("resolved {}", self.key);
                State::Resolved(freeze(merge(&self.model, fields)))
            }
            Ok(other) => {
                tracing::warn!("non-object response for {}", self.key);
                State::Failed(Arc::new(TransportError::Malformed {
                    url: self.key.clone(),
                    reason: format!("expected a JSON object, found {}", kind(&other)),
                }))
            }
            Err(error) => {
                tracing::warn!("fetch of {} failed: {}", self.key, error);
                State::Failed(Arc::new(error))
            }
        };
        drop(inner);

        self.notify();
    }

    fn notify(&self) {
        self.observers.notify(self);
    }
}

fn kind(json: &Json) -> &'static str {
    match json {
        Json::Null => "null",
        Json::Bool(_) => "a boolean",
        Json::Number(_) => "a number",
        Json::String(_) => "a string",
        Json::Array(_) => "an array",
        Json::Object(_) => "an object",
    }
}
