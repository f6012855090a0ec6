// src/engine/report.rs

use crate::errors::{Result, SyncError};

/// What one pack pipeline did.
///
/// `errors` holds failures of the initial pass, of artifact writes and of
/// the bundler; they make the build unsuccessful. Watch-time failures are
/// only logged and counted.
#[derive(Debug, Default)]
pub struct PackReport {
    pub pack: String,
    pub copied: usize,
    pub unchanged: usize,
    pub removed_orphans: usize,
    pub errors: Vec<SyncError>,
    pub events_applied: usize,
    pub event_errors: usize,
    pub watch_errors: usize,
}

impl PackReport {
    pub fn new(pack: impl Into<String>) -> Self {
        Self {
            pack: pack.into(),
            ..Self::default()
        }
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Final result of one pipeline: a report, or the fatal error that stopped it.
#[derive(Debug)]
pub struct PackOutcome {
    pub pack: String,
    pub result: Result<PackReport>,
}

impl PackOutcome {
    pub fn is_success(&self) -> bool {
        matches!(&self.result, Ok(report) if report.is_clean())
    }
}

/// Outcomes of every pipeline, in pack order.
#[derive(Debug, Default)]
pub struct BuildReport {
    pub outcomes: Vec<PackOutcome>,
}

impl BuildReport {
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(PackOutcome::is_success)
    }

    /// Packs that failed fatally or reported errors.
    pub fn failed(&self) -> Vec<&PackOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success()).collect()
    }

    pub fn outcome(&self, pack: &str) -> Option<&PackOutcome> {
        self.outcomes.iter().find(|o| o.pack == pack)
    }
}
