// src/watch/watcher.rs

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::errors::{Result, SyncError};
use crate::fs::FileSystem;
use crate::sync::snapshot::Snapshot;
use crate::watch::classify::ChangeClassifier;
use crate::watch::debounce::{Debouncer, POLL_INTERVAL, STABILITY_THRESHOLD};
use crate::watch::event::ChangeEvent;
use crate::watch::path_utils::relative_str;
use crate::watch::patterns::PatternSet;

/// Stream of normalized changes. `Err` items carry `WatchError`s from the
/// notification backend; the stream keeps going after them.
pub type ChangeStream = mpsc::UnboundedReceiver<Result<ChangeEvent>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatcherState {
    Idle,
    Watching,
    Closing,
    Closed,
}

#[derive(Debug, Clone, Copy)]
pub struct WatchOptions {
    pub stability_threshold: Duration,
    pub poll_interval: Duration,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            stability_threshold: STABILITY_THRESHOLD,
            poll_interval: POLL_INTERVAL,
        }
    }
}

/// Messages from the blocking notify callback into the async debounce task.
#[derive(Debug)]
enum RawEvent {
    Paths(Vec<PathBuf>),
    Error(String),
}

/// Watches a pack source root and produces debounced [`ChangeEvent`]s.
///
/// `known` is the snapshot taken by the initial mirror pass; it tells the
/// watcher which entries already exist so it can tell additions from
/// modifications.
pub struct ChangeWatcher {
    fs: Arc<dyn FileSystem>,
    root: PathBuf,
    patterns: PatternSet,
    known: Option<Snapshot>,
    options: WatchOptions,
    state: WatcherState,
    inner: Option<RecommendedWatcher>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for ChangeWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeWatcher")
            .field("root", &self.root)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl ChangeWatcher {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        root: impl Into<PathBuf>,
        patterns: PatternSet,
        known: Snapshot,
        options: WatchOptions,
    ) -> Self {
        Self {
            fs,
            root: root.into(),
            patterns,
            known: Some(known),
            options,
            state: WatcherState::Idle,
            inner: None,
            shutdown_tx: None,
            task: None,
        }
    }

    pub fn state(&self) -> WatcherState {
        self.state
    }

    /// Start receiving OS notifications for the root, recursively.
    ///
    /// Must be called from within a Tokio runtime. Fails with `WatchError`
    /// if the watcher was already started or the backend refuses the root.
    pub fn start(&mut self) -> Result<ChangeStream> {
        if self.state != WatcherState::Idle {
            return Err(SyncError::WatchError(format!(
                "watcher for {:?} cannot start from state {:?}",
                self.root, self.state
            )));
        }

        // Canonicalize once so we have a stable base path.
        let root = self.root.canonicalize().unwrap_or_else(|_| self.root.clone());

        let (raw_tx, raw_rx) = mpsc::unbounded_channel::<RawEvent>();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| {
                let msg = match res {
                    // Reads never change what we mirror.
                    Ok(event) if matches!(event.kind, EventKind::Access(_)) => return,
                    Ok(event) => RawEvent::Paths(event.paths),
                    Err(err) => RawEvent::Error(err.to_string()),
                };
                // The receiver is gone once the watcher is closing.
                let _ = raw_tx.send(msg);
            },
            Config::default(),
        )?;

        watcher.watch(&root, RecursiveMode::Recursive)?;

        let (out_tx, out_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let classifier = ChangeClassifier::new(
            Arc::clone(&self.fs),
            root.clone(),
            self.patterns.clone(),
            self.known.take().unwrap_or_default(),
        );
        let debouncer = Debouncer::new(self.options.stability_threshold);

        let task = tokio::spawn(debounce_loop(
            root.clone(),
            raw_rx,
            shutdown_rx,
            out_tx,
            debouncer,
            classifier,
            self.options.poll_interval,
        ));

        info!("file watcher started on {:?}", root);

        self.inner = Some(watcher);
        self.shutdown_tx = Some(shutdown_tx);
        self.task = Some(task);
        self.state = WatcherState::Watching;

        Ok(out_rx)
    }

    /// Stop watching. Raw notifications stop immediately; changes still
    /// waiting for their quiet period are emitted once before the stream
    /// ends. Calling this again is a no-op.
    pub async fn close(&mut self) {
        match self.state {
            WatcherState::Idle => {
                self.state = WatcherState::Closed;
                return;
            }
            WatcherState::Closing | WatcherState::Closed => return,
            WatcherState::Watching => {}
        }

        self.state = WatcherState::Closing;

        drop(self.inner.take());

        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                warn!(root = ?self.root, error = %err, "watcher task ended abnormally");
            }
        }

        self.state = WatcherState::Closed;
        debug!(root = ?self.root, "watcher closed");
    }
}

async fn debounce_loop(
    root: PathBuf,
    mut raw_rx: mpsc::UnboundedReceiver<RawEvent>,
    mut shutdown_rx: oneshot::Receiver<()>,
    out_tx: mpsc::UnboundedSender<Result<ChangeEvent>>,
    mut debouncer: Debouncer,
    mut classifier: ChangeClassifier,
    poll_interval: Duration,
) {
    let mut ticker = tokio::time::interval(poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = &mut shutdown_rx => break,
            raw = raw_rx.recv() => match raw {
                Some(raw) => ingest(&root, raw, &mut debouncer, &out_tx),
                None => break,
            },
            _ = ticker.tick() => {
                for rel in debouncer.take_due(Instant::now()) {
                    emit(&mut classifier, &rel, &out_tx);
                }
            }
        }
    }

    // Anything the backend delivered before it was dropped still counts.
    while let Ok(raw) = raw_rx.try_recv() {
        ingest(&root, raw, &mut debouncer, &out_tx);
    }
    for rel in debouncer.drain() {
        emit(&mut classifier, &rel, &out_tx);
    }

    debug!("watcher event loop finished");
}

fn ingest(
    root: &Path,
    raw: RawEvent,
    debouncer: &mut Debouncer,
    out_tx: &mpsc::UnboundedSender<Result<ChangeEvent>>,
) {
    match raw {
        RawEvent::Paths(paths) => {
            let now = Instant::now();
            for path in paths {
                match relative_str(root, &path) {
                    Some(rel) if rel.is_empty() => {}
                    Some(rel) => debouncer.record(rel, now),
                    None => warn!("could not relativize path {:?} against root {:?}", path, root),
                }
            }
        }
        RawEvent::Error(msg) => {
            let _ = out_tx.send(Err(SyncError::WatchError(msg)));
        }
    }
}

fn emit(
    classifier: &mut ChangeClassifier,
    rel: &str,
    out_tx: &mpsc::UnboundedSender<Result<ChangeEvent>>,
) {
    for event in classifier.classify(rel) {
        debug!(kind = %event.kind, path = %event.path, "emitting change");
        if out_tx.send(Ok(event)).is_err() {
            return;
        }
    }
}
