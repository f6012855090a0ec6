// src/engine/orchestrator.rs

use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use tracing::{error, info};

use crate::artifact::ARTIFACT_DEBOUNCE;
use crate::errors::SyncError;
use crate::exec::ScriptBundler;
use crate::fs::FileSystem;
use crate::pack::PackSpec;
use crate::watch::WatchOptions;

use super::pipeline::Pipeline;
use super::report::{BuildReport, PackOutcome};
use super::shutdown::ShutdownSignal;

/// Runs one [`Pipeline`] per pack concurrently.
///
/// Pipelines are independent: a fatal error in one is recorded in its
/// [`PackOutcome`] and never cancels the others. `run` returns only after
/// every pipeline has finished.
pub struct BuildOrchestrator {
    packs: Vec<PackSpec>,
    fs: Arc<dyn FileSystem>,
    bundler: Arc<dyn ScriptBundler>,
    watch_options: WatchOptions,
    artifact_delay: Duration,
}

impl std::fmt::Debug for BuildOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<_> = self.packs.iter().map(|p| p.name.as_str()).collect();
        f.debug_struct("BuildOrchestrator")
            .field("packs", &names)
            .finish_non_exhaustive()
    }
}

impl BuildOrchestrator {
    pub fn new(packs: Vec<PackSpec>, fs: Arc<dyn FileSystem>, bundler: Arc<dyn ScriptBundler>) -> Self {
        Self {
            packs,
            fs,
            bundler,
            watch_options: WatchOptions::default(),
            artifact_delay: ARTIFACT_DEBOUNCE,
        }
    }

    pub fn with_watch_options(mut self, options: WatchOptions) -> Self {
        self.watch_options = options;
        self
    }

    pub fn with_artifact_delay(mut self, delay: Duration) -> Self {
        self.artifact_delay = delay;
        self
    }

    pub async fn run(&self, shutdown: ShutdownSignal) -> BuildReport {
        let mut handles = Vec::with_capacity(self.packs.len());

        for spec in &self.packs {
            let pipeline = Pipeline::new(spec.clone(), Arc::clone(&self.fs), Arc::clone(&self.bundler))
                .with_watch_options(self.watch_options)
                .with_artifact_delay(self.artifact_delay);
            let handle = tokio::spawn(pipeline.run(shutdown.clone()));
            handles.push((spec.name.clone(), handle));
        }

        let mut report = BuildReport::default();

        for (pack, handle) in handles {
            let result = match handle.await {
                Ok(result) => result,
                Err(e) => Err(SyncError::Other(anyhow!("pipeline task for pack '{pack}' failed: {e}"))),
            };

            match &result {
                Ok(r) if r.is_clean() => info!(
                    pack = %pack,
                    copied = r.copied,
                    removed_orphans = r.removed_orphans,
                    events = r.events_applied,
                    "pack finished"
                ),
                Ok(r) => {
                    for e in &r.errors {
                        error!(pack = %pack, error = %e, "pack reported an error");
                    }
                }
                Err(e) => error!(pack = %pack, error = %e, "pack failed"),
            }

            report.outcomes.push(PackOutcome { pack, result });
        }

        report
    }
}
