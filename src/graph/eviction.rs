//! Pluggable eviction strategies for [`Graph`](super::Graph).
//!
//! The graph consults its strategy every time it stores a new entry and
//! removes whatever keys the strategy hands back. The default,
//! [`Unbounded`], never evicts: the cache grows for its whole lifetime.

use super::lock;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Eviction policy seam.
pub trait Eviction: Send + Sync {
    /// Record that `key` was stored; return the keys to drop as a result.
    fn admit(&self, key: &str) -> Vec<String>;

    /// Record that `key` was removed by other means.
    fn forget(&self, key: &str);
}

/// Keep every entry.
#[derive(Debug, Default, Clone, Copy)]
pub struct Unbounded;

impl Eviction for Unbounded {
    fn admit(&self, _key: &str) -> Vec<String> {
        Vec::new()
    }

    fn forget(&self, _key: &str) {}
}

/// Keep at most `max` entries, dropping the oldest first.
#[derive(Debug)]
pub struct Capacity {
    max: usize,
    order: Mutex<VecDeque<String>>,
}

impl Capacity {
    /// Bound the cache to `max` entries (at least one).
    pub fn new(max: usize) -> Self {
        Self {
            max: max.max(1),
            order: Mutex::new(VecDeque::new()),
        }
    }

    /// Configured bound.
    pub fn max(&self) -> usize {
        self.max
    }
}

impl Eviction for Capacity {
    fn admit(&self, key: &str) -> Vec<String> {
        let mut order = lock(&self.order);
        order.push_back(key.to_string());

        let excess = order.len().saturating_sub(self.max);
        order.drain(..excess).collect()
    }

    fn forget(&self, key: &str) {
        lock(&self.order).retain(|k| k != key);
    }
}
