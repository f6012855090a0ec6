// src/sync/incremental.rs

//! Applies single change events to the destination tree.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use crate::errors::{Result, SyncError};
use crate::fs::FileSystem;
use crate::watch::event::{ChangeEvent, ChangeKind};

/// Mirrors the effect of each [`ChangeEvent`] from `src_dir` to `out_dir`.
///
/// Every operation is idempotent: copies overwrite and deleting a missing
/// path succeeds, so a duplicated event leaves the same state behind.
#[derive(Debug, Clone)]
pub struct IncrementalSync {
    fs: Arc<dyn FileSystem>,
    src_dir: PathBuf,
    out_dir: PathBuf,
}

impl IncrementalSync {
    pub fn new(fs: Arc<dyn FileSystem>, src_dir: PathBuf, out_dir: PathBuf) -> Self {
        Self {
            fs,
            src_dir,
            out_dir,
        }
    }

    pub fn apply(&self, event: &ChangeEvent) -> Result<()> {
        let src_path = self.src_dir.join(&event.path);
        let dest_path = self.out_dir.join(&event.path);

        match event.kind {
            ChangeKind::Added | ChangeKind::Modified => {
                if let Some(parent) = dest_path.parent() {
                    self.fs
                        .create_dir_all(parent)
                        .map_err(|e| SyncError::CopyError {
                            path: src_path.clone(),
                            source: e,
                        })?;
                }
                self.fs
                    .copy_file(&src_path, &dest_path)
                    .map_err(|e| SyncError::CopyError {
                        path: src_path.clone(),
                        source: e,
                    })?;
            }
            ChangeKind::AddedDir => {
                self.fs
                    .create_dir_all(&dest_path)
                    .map_err(|e| SyncError::CopyError {
                        path: src_path.clone(),
                        source: e,
                    })?;
            }
            ChangeKind::Removed | ChangeKind::RemovedDir => {
                self.fs
                    .remove_all(&dest_path)
                    .map_err(|e| SyncError::DeleteError {
                        path: dest_path.clone(),
                        source: e,
                    })?;
            }
        }

        debug!(kind = %event.kind, path = %event.path, "applied change to destination");
        Ok(())
    }
}
