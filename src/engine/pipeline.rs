// src/engine/pipeline.rs

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::anyhow;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::artifact::{DerivedArtifactRegistry, ARTIFACT_DEBOUNCE};
use crate::errors::{Result, SyncError};
use crate::exec::{BundleRequest, ScriptBundler};
use crate::fs::FileSystem;
use crate::pack::PackSpec;
use crate::sync::{IncrementalSync, Mirror};
use crate::watch::{ChangeEvent, ChangeStream, ChangeWatcher, WatchOptions};

use super::report::PackReport;
use super::shutdown::ShutdownSignal;

/// Drives one pack from the initial mirror pass to watch-mode shutdown.
///
/// All mutable state (known entries, artifact sets) is owned by this
/// pipeline; events are applied strictly in arrival order.
pub struct Pipeline {
    spec: PackSpec,
    fs: Arc<dyn FileSystem>,
    bundler: Arc<dyn ScriptBundler>,
    watch_options: WatchOptions,
    artifact_delay: Duration,
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("pack", &self.spec.name)
            .field("watch", &self.spec.watch)
            .finish_non_exhaustive()
    }
}

impl Pipeline {
    pub fn new(spec: PackSpec, fs: Arc<dyn FileSystem>, bundler: Arc<dyn ScriptBundler>) -> Self {
        Self {
            spec,
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

    /// Run the pipeline to completion.
    ///
    /// Without watch mode this returns after the initial pass, artifact
    /// generation and bundling. With it, the pipeline keeps applying changes
    /// until `shutdown` fires, then closes the watcher, drains what is left
    /// and waits for the bundler.
    pub async fn run(self, mut shutdown: ShutdownSignal) -> Result<PackReport> {
        let spec = &self.spec;
        let patterns = spec.pattern_set()?;
        let mut report = PackReport::new(&spec.name);

        let mirror = Mirror::new(Arc::clone(&self.fs));
        let sync = {
            let patterns = patterns.clone();
            let spec = spec.clone();
            tokio::task::spawn_blocking(move || mirror.sync(&patterns, &spec))
                .await
                .map_err(|e| SyncError::Other(anyhow!("initial sync task failed: {e}")))??
        };

        report.copied = sync.copied;
        report.unchanged = sync.unchanged;
        report.removed_orphans = sync.removed_orphans;
        report.errors.extend(sync.errors);

        let mut registry =
            DerivedArtifactRegistry::new(Arc::clone(&self.fs), spec.out_dir.clone(), &spec.artifacts)?
                .with_delay(self.artifact_delay);
        registry.seed(&sync.source);
        report.errors.extend(registry.write_all());

        let bundle_task = self.spawn_bundler(&shutdown);

        if spec.watch {
            let mut watcher = ChangeWatcher::new(
                Arc::clone(&self.fs),
                spec.src_dir.clone(),
                patterns,
                sync.source,
                self.watch_options,
            );
            let mut events = match watcher.start() {
                Ok(events) => events,
                Err(e) => {
                    // The bundler may already be watching; stop waiting on it.
                    if let Some(task) = bundle_task {
                        task.abort();
                    }
                    return Err(e);
                }
            };
            info!(pack = %spec.name, "watching for file changes in {:?}", spec.src_dir);

            let incremental =
                IncrementalSync::new(Arc::clone(&self.fs), spec.src_dir.clone(), spec.out_dir.clone());

            loop {
                let deadline = registry.next_deadline();
                let artifact_due = async move {
                    match deadline {
                        Some(at) => tokio::time::sleep_until(at.into()).await,
                        None => std::future::pending::<()>().await,
                    }
                };

                tokio::select! {
                    biased;

                    _ = shutdown.wait() => {
                        debug!(pack = %spec.name, "shutdown requested");
                        break;
                    }

                    next = events.recv() => match next {
                        Some(Ok(event)) => {
                            self.handle_event(&event, &incremental, &mut registry, &mut report);
                        }
                        Some(Err(e)) => {
                            warn!(pack = %spec.name, error = %e, "watcher error");
                            report.watch_errors += 1;
                        }
                        None => {
                            warn!(pack = %spec.name, "change stream ended unexpectedly");
                            break;
                        }
                    },

                    _ = artifact_due => {
                        let errors = registry.flush_due(Instant::now());
                        report.event_errors += errors.len();
                    }
                }
            }

            watcher.close().await;
            self.drain(&mut events, &incremental, &mut registry, &mut report);
            report.event_errors += registry.flush_pending().len();
            info!(pack = %spec.name, "closed the watcher for {:?}", spec.src_dir);
        }

        if let Some(task) = bundle_task {
            match task.await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    warn!(pack = %spec.name, error = %e, "script bundling failed");
                    report.errors.push(e);
                }
                Err(e) => report
                    .errors
                    .push(SyncError::BundleError(format!("bundler task failed: {e}"))),
            }
        }

        Ok(report)
    }

    fn spawn_bundler(&self, shutdown: &ShutdownSignal) -> Option<JoinHandle<Result<()>>> {
        let request = BundleRequest::for_pack(&self.spec)?;
        let bundler = Arc::clone(&self.bundler);
        let shutdown = shutdown.clone();
        Some(tokio::spawn(async move { bundler.bundle(request, shutdown).await }))
    }

    fn handle_event(
        &self,
        event: &ChangeEvent,
        incremental: &IncrementalSync,
        registry: &mut DerivedArtifactRegistry,
        report: &mut PackReport,
    ) {
        info!(
            pack = %self.spec.name,
            "{}: {}",
            event.kind,
            self.spec.src_dir.join(&event.path).to_string_lossy().replace('\\', "/")
        );

        match incremental.apply(event) {
            Ok(()) => report.events_applied += 1,
            Err(e) => {
                warn!(pack = %self.spec.name, error = %e, "failed to apply change");
                report.event_errors += 1;
            }
        }

        if registry.observe(event, Instant::now()) {
            debug!(pack = %self.spec.name, path = %event.path, "derived artifact scheduled");
        }
    }

    /// Apply events emitted while the watcher was closing.
    fn drain(
        &self,
        events: &mut ChangeStream,
        incremental: &IncrementalSync,
        registry: &mut DerivedArtifactRegistry,
        report: &mut PackReport,
    ) {
        while let Ok(next) = events.try_recv() {
            match next {
                Ok(event) => self.handle_event(&event, incremental, registry, report),
                Err(e) => {
                    warn!(pack = %self.spec.name, error = %e, "watcher error");
                    report.watch_errors += 1;
                }
            }
        }
    }
}
