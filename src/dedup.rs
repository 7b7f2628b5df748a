// src/dedup.rs
//! Seen-item store: prevents the same item from being processed twice.
//!
//! Bounded and time-windowed rather than a bare grow-forever set: entries
//! older than the retention window (or beyond the capacity bound) are
//! evicted on insert. State is process-lifetime only; nothing survives a
//! restart.

use chrono::{DateTime, Duration, Utc};
use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;

pub const DEFAULT_CAPACITY: usize = 4096;
pub const DEFAULT_RETENTION_SECS: i64 = 24 * 3600;

pub struct SeenStore {
    inner: Mutex<SeenInner>,
    capacity: usize,
    retention: Duration,
}

struct SeenInner {
    index: HashSet<String>,
    order: VecDeque<(String, DateTime<Utc>)>,
}

impl Default for SeenStore {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, DEFAULT_RETENTION_SECS)
    }
}

impl SeenStore {
    pub fn new(capacity: usize, retention_secs: i64) -> Self {
        Self {
            inner: Mutex::new(SeenInner {
                index: HashSet::new(),
                order: VecDeque::new(),
            }),
            capacity: capacity.max(1),
            retention: Duration::seconds(retention_secs.max(1)),
        }
    }

    /// Atomic check-and-set: returns `true` and records `id` the first time
    /// it is seen, `false` on every later call. Concurrent cycles (scheduled
    /// + manual) share this store, so the whole operation runs under one
    /// lock.
    pub fn is_new(&self, id: &str) -> bool {
        self.is_new_at(id, Utc::now())
    }

    /// Clock-injectable variant for tests.
    pub fn is_new_at(&self, id: &str, now: DateTime<Utc>) -> bool {
        let mut g = self.inner.lock().expect("seen store lock poisoned");

        // Evict expired entries first so a long-gone id counts as new again.
        while let Some((_, inserted_at)) = g.order.front() {
            if now - *inserted_at <= self.retention {
                break;
            }
            if let Some((front_id, _)) = g.order.pop_front() {
                g.index.remove(&front_id);
            }
        }

        if !g.index.insert(id.to_string()) {
            return false;
        }

        // Capacity bound: make room before recording the fresh id.
        while g.order.len() >= self.capacity {
            if let Some((front_id, _)) = g.order.pop_front() {
                g.index.remove(&front_id);
            }
        }
        g.order.push_back((id.to_string(), now));
        true
    }

    pub fn len(&self) -> usize {
        self.inner.lock().expect("seen store lock poisoned").index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
