//! Scripted transport for tests.

use crate::graph::{Transport, TransportError, lock};
use futures::FutureExt;
use futures::future::BoxFuture;
use serde_json::Value as Json;
use std::collections::HashMap;
use std::sync::Mutex;
use tokio::sync::watch;

/// Transport answering from a table of scripted outcomes.
///
/// URLs without a scripted outcome fail with status `404`. Outcomes are looked
/// up when `fetch` is called, so script them before triggering the fetch.
#[derive(Debug, Default)]
pub struct MockTransport {
    outcomes: Mutex<HashMap<String, Result<Json, TransportError>>>,
    fetches: Mutex<HashMap<String, usize>>,
    gate: Mutex<Option<watch::Receiver<bool>>>,
}

/// Holds fetches pending until released (or dropped).
#[derive(Debug)]
pub struct Gate {
    open: watch::Sender<bool>,
}

impl Gate {
    /// Let held and future fetches complete.
    pub fn release(&self) {
        self.open.send_replace(true);
    }
}

impl MockTransport {
    /// Transport with nothing scripted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `url` with `document`.
    pub fn respond(&self, url: &str, document: Json) {
        lock(&self.outcomes).insert(url.to_string(), Ok(document));
    }

    /// Fail fetches of `url` with `error`.
    pub fn fail(&self, url: &str, error: TransportError) {
        lock(&self.outcomes).insert(url.to_string(), Err(error));
    }

    /// Hold every fetch started from now on until the returned gate opens.
    pub fn hold(&self) -> Gate {
        let (open, gate) = watch::channel(false);
        *lock(&self.gate) = Some(gate);
        Gate { open }
    }

    /// Number of fetches of `url` so far.
    pub fn fetch_count(&self, url: &str) -> usize {
        lock(&self.fetches).get(url).copied().unwrap_or(0)
    }

    /// Number of fetches of any URL so far.
    pub fn fetches(&self) -> usize {
        lock(&self.fetches).values().sum()
    }
}

impl Transport for MockTransport {
    fn fetch(&self, url: &str) -> BoxFuture<'static, Result<Json, TransportError>> {
        *lock(&self.fetches).entry(url.to_string()).or_default() += 1;

        let outcome = lock(&self.outcomes).get(url).cloned().unwrap_or_else(|| {
            Err(TransportError::Status {
                url: url.to_string(),
                status: 404,
            })
        });
        let gate = lock(&self.gate).clone();

        async move {
            if let Some(mut gate) = gate {
                let _ = gate.wait_for(|open| *open).await;
            }
            outcome
        }
        .boxed()
    }
}
