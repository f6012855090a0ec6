// src/sync/mirror.rs

//! One-shot source → destination synchronization.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::errors::{Result, SyncError};
use crate::fs::FileSystem;
use crate::pack::PackSpec;
use crate::sync::hash::same_content;
use crate::sync::snapshot::{snapshot, EntryKind, FileSetEntry, Snapshot};
use crate::types::CopyPolicy;
use crate::watch::path_utils::is_within;
use crate::watch::patterns::PatternSet;

/// Outcome of a [`Mirror::sync`] pass.
///
/// `errors` holds per-entry `CopyError`/`DeleteError`s; the counts describe
/// what did succeed. `source` is the source snapshot the pass worked from,
/// used to seed the watcher and derived artifacts.
#[derive(Debug, Default)]
pub struct SyncResult {
    pub copied: usize,
    /// Files skipped by the `changed` copy policy.
    pub unchanged: usize,
    pub removed_orphans: usize,
    pub errors: Vec<SyncError>,
    pub source: Snapshot,
}

impl SyncResult {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Performs full synchronization passes for a pack.
#[derive(Debug, Clone)]
pub struct Mirror {
    fs: Arc<dyn FileSystem>,
}

impl Mirror {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Bring `spec.out_dir` in line with `spec.src_dir` under `patterns`.
    ///
    /// Fails only if the destination root cannot be created or either tree
    /// cannot be listed; single-entry failures are collected in the result.
    pub fn sync(&self, patterns: &PatternSet, spec: &PackSpec) -> Result<SyncResult> {
        let fs = self.fs.as_ref();

        fs.create_dir_all(&spec.out_dir)
            .map_err(|e| SyncError::io_at(&spec.out_dir, e))?;

        let source = snapshot(fs, &spec.src_dir, patterns)?;
        let dest = snapshot(fs, &spec.out_dir, patterns)?;

        let mut result = SyncResult::default();

        let orphans = dest.entries_not_in(&source);
        if spec.remove_orphans {
            result.removed_orphans = self.remove_orphans(&spec.out_dir, &orphans, &mut result.errors);
        } else if !orphans.is_empty() {
            debug!(
                pack = %spec.name,
                orphans = orphans.len(),
                "orphan removal disabled; leaving destination entries in place"
            );
        }

        for entry in source.iter() {
            let src_path = spec.src_dir.join(&entry.path);
            let dest_path = spec.out_dir.join(&entry.path);

            match entry.kind {
                EntryKind::Directory => {
                    if let Err(e) = fs.create_dir_all(&dest_path) {
                        warn!(path = ?dest_path, error = %e, "failed to create directory");
                        result.errors.push(SyncError::CopyError {
                            path: dest_path,
                            source: e,
                        });
                    }
                }
                EntryKind::File => {
                    match self.copy_file(&src_path, &dest_path, spec.copy_policy) {
                        Ok(true) => result.copied += 1,
                        Ok(false) => result.unchanged += 1,
                        Err(e) => {
                            warn!(path = ?src_path, error = %e, "failed to copy file");
                            result.errors.push(SyncError::CopyError {
                                path: src_path,
                                source: e,
                            });
                        }
                    }
                }
            }
        }

        info!(
            pack = %spec.name,
            src = ?spec.src_dir,
            copied = result.copied,
            unchanged = result.unchanged,
            removed_orphans = result.removed_orphans,
            errors = result.errors.len(),
            "initial file system sync completed"
        );

        result.source = source;
        Ok(result)
    }

    /// Copy one file, creating its parent first. Returns whether the file
    /// was written.
    fn copy_file(&self, src: &Path, dest: &Path, policy: CopyPolicy) -> std::io::Result<bool> {
        let fs = self.fs.as_ref();

        if policy == CopyPolicy::Changed && same_content(fs, src, dest)? {
            return Ok(false);
        }

        if let Some(parent) = dest.parent() {
            fs.create_dir_all(parent)?;
        }
        fs.copy_file(src, dest)?;
        Ok(true)
    }

    /// Delete `orphans` under `out_dir`. Entries inside a directory that was
    /// already removed are counted without a second delete.
    fn remove_orphans(
        &self,
        out_dir: &Path,
        orphans: &[FileSetEntry],
        errors: &mut Vec<SyncError>,
    ) -> usize {
        let mut removed_dirs: Vec<&str> = Vec::new();
        let mut removed = 0;

        for entry in orphans {
            if removed_dirs.iter().any(|dir| is_within(dir, &entry.path)) {
                removed += 1;
                continue;
            }

            let path = out_dir.join(&entry.path);
            match self.fs.remove_all(&path) {
                Ok(()) => {
                    debug!(path = ?path, "removed orphan");
                    removed += 1;
                    if entry.kind == EntryKind::Directory {
                        removed_dirs.push(&entry.path);
                    }
                }
                Err(e) => {
                    warn!(path = ?path, error = %e, "failed to remove orphan");
                    errors.push(SyncError::DeleteError { path, source: e });
                }
            }
        }

        removed
    }
}
