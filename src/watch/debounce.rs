// src/watch/debounce.rs

//! Per-path quiescence tracking.
//!
//! This is the pure half of the watcher: it only sees relative paths and
//! `Instant`s, so tests can drive it without a filesystem or a runtime.

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// A path must be quiet for this long before its change is emitted.
pub const STABILITY_THRESHOLD: Duration = Duration::from_millis(300);

/// How often pending paths are checked against [`STABILITY_THRESHOLD`].
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Collapses bursts of raw notifications into one entry per path.
#[derive(Debug)]
pub struct Debouncer {
    threshold: Duration,
    /// Relative path -> time of the most recent raw event.
    pending: HashMap<String, Instant>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(STABILITY_THRESHOLD)
    }
}

impl Debouncer {
    pub fn new(threshold: Duration) -> Self {
        Self {
            threshold,
            pending: HashMap::new(),
        }
    }

    /// Note a raw event for `rel_path`. A path that is already pending has
    /// its quiet period restarted.
    pub fn record(&mut self, rel_path: impl Into<String>, now: Instant) {
        self.pending.insert(rel_path.into(), now);
    }

    /// Remove and return every path that has been quiet for at least the
    /// threshold, sorted so parents come before their children.
    pub fn take_due(&mut self, now: Instant) -> Vec<String> {
        let threshold = self.threshold;
        let mut due: Vec<String> = self
            .pending
            .iter()
            .filter(|(_, last)| now.saturating_duration_since(**last) >= threshold)
            .map(|(path, _)| path.clone())
            .collect();

        for path in &due {
            self.pending.remove(path);
        }

        due.sort();
        due
    }

    /// Remove and return every pending path regardless of age.
    pub fn drain(&mut self) -> Vec<String> {
        let mut all: Vec<String> = self.pending.drain().map(|(path, _)| path).collect();
        all.sort();
        all
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }
}
