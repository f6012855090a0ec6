// src/artifact/registry.rs

use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use globset::GlobMatcher;
use tracing::{debug, info, warn};

use crate::artifact::render::render_entries;
use crate::errors::{Result, SyncError};
use crate::fs::FileSystem;
use crate::pack::ArtifactSpec;
use crate::sync::snapshot::Snapshot;
use crate::watch::event::{ChangeEvent, ChangeKind};
use crate::watch::path_utils::normalize_rel;
use crate::watch::patterns::compile_glob;

/// Quiet period after the last relevant change before an artifact is
/// rewritten.
pub const ARTIFACT_DEBOUNCE: Duration = Duration::from_millis(500);

struct TrackedArtifact {
    spec: ArtifactSpec,
    trigger: GlobMatcher,
    destination: String,
    /// Normalized relative paths of the matching source files.
    paths: BTreeSet<String>,
    deadline: Option<Instant>,
}

impl fmt::Debug for TrackedArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackedArtifact")
            .field("destination", &self.destination)
            .field("paths", &self.paths.len())
            .field("deadline", &self.deadline)
            .finish_non_exhaustive()
    }
}

/// All derived artifacts of one pack.
#[derive(Debug)]
pub struct DerivedArtifactRegistry {
    fs: Arc<dyn FileSystem>,
    out_dir: PathBuf,
    delay: Duration,
    artifacts: Vec<TrackedArtifact>,
}

impl DerivedArtifactRegistry {
    pub fn new(fs: Arc<dyn FileSystem>, out_dir: PathBuf, specs: &[ArtifactSpec]) -> Result<Self> {
        let mut artifacts = Vec::with_capacity(specs.len());
        for spec in specs {
            artifacts.push(TrackedArtifact {
                trigger: compile_glob(&spec.trigger)?,
                destination: normalize_rel(&spec.destination),
                spec: spec.clone(),
                paths: BTreeSet::new(),
                deadline: None,
            });
        }

        Ok(Self {
            fs,
            out_dir,
            delay: ARTIFACT_DEBOUNCE,
            artifacts,
        })
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    /// Replace every tracked set with the matching files of `snapshot`.
    pub fn seed(&mut self, snapshot: &Snapshot) {
        for artifact in &mut self.artifacts {
            artifact.paths.clear();
            artifact.deadline = None;
            for path in snapshot.files() {
                let path = normalize_rel(path);
                if path != artifact.destination && artifact.trigger.is_match(&path) {
                    artifact.paths.insert(path);
                }
            }
            debug!(
                artifact = %artifact.destination,
                paths = artifact.paths.len(),
                "seeded derived artifact"
            );
        }
    }

    /// Update tracked sets for an `Added`/`Removed` event. Returns true if
    /// any artifact changed; its write is (re)scheduled `delay` after `now`.
    pub fn observe(&mut self, event: &ChangeEvent, now: Instant) -> bool {
        let adding = match event.kind {
            ChangeKind::Added => true,
            ChangeKind::Removed => false,
            _ => return false,
        };

        let path = normalize_rel(&event.path);
        let mut changed = false;

        for artifact in &mut self.artifacts {
            if path == artifact.destination || !artifact.trigger.is_match(&path) {
                continue;
            }
            let updated = if adding {
                artifact.paths.insert(path.clone())
            } else {
                artifact.paths.remove(&path)
            };
            if updated {
                artifact.deadline = Some(now + self.delay);
                changed = true;
            }
        }

        changed
    }

    /// Earliest pending write, if any.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.artifacts.iter().filter_map(|a| a.deadline).min()
    }

    fn find(&self, destination: &str) -> Option<&TrackedArtifact> {
        let destination = normalize_rel(destination);
        self.artifacts.iter().find(|a| a.destination == destination)
    }

    /// Tracked source paths of the artifact written to `destination`.
    pub fn tracked(&self, destination: &str) -> Option<&BTreeSet<String>> {
        self.find(destination).map(|a| &a.paths)
    }

    /// Rendered content of the artifact written to `destination`.
    pub fn render(&self, destination: &str) -> Option<String> {
        self.find(destination)
            .map(|a| render_entries(a.spec.generator, &a.paths))
    }

    /// Write every artifact whose deadline has passed.
    pub fn flush_due(&mut self, now: Instant) -> Vec<SyncError> {
        self.flush_where(|deadline| deadline.is_some_and(|d| d <= now))
    }

    /// Write every artifact with a pending change, ignoring deadlines.
    pub fn flush_pending(&mut self) -> Vec<SyncError> {
        self.flush_where(|deadline| deadline.is_some())
    }

    /// Write every artifact unconditionally (initial generation).
    pub fn write_all(&mut self) -> Vec<SyncError> {
        self.flush_where(|_| true)
    }

    fn flush_where(&mut self, due: impl Fn(Option<Instant>) -> bool) -> Vec<SyncError> {
        let mut errors = Vec::new();

        for artifact in &mut self.artifacts {
            if !due(artifact.deadline) {
                continue;
            }
            artifact.deadline = None;

            let dest = self.out_dir.join(&artifact.destination);
            let contents = render_entries(artifact.spec.generator, &artifact.paths);

            match self.fs.write(&dest, contents.as_bytes()) {
                Ok(()) => info!(
                    paths = artifact.paths.len(),
                    "(re-)generated {} at {}",
                    artifact.destination,
                    dest.to_string_lossy().replace('\\', "/")
                ),
                Err(e) => {
                    warn!(path = ?dest, error = %e, "failed to write derived artifact");
                    errors.push(SyncError::io_at(&dest, e));
                }
            }
        }

        errors
    }
}
