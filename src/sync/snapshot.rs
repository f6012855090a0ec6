// src/sync/snapshot.rs

//! Pattern-filtered directory listings.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::errors::{Result, SyncError};
use crate::fs::FileSystem;
use crate::watch::patterns::PatternSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntryKind {
    File,
    Directory,
}

/// A path relative to a pack root (forward slashes) and what it is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileSetEntry {
    pub path: String,
    pub kind: EntryKind,
}

impl FileSetEntry {
    pub fn file(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::File,
        }
    }

    pub fn dir(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::Directory,
        }
    }
}

/// Set of entries keyed by relative path. Iteration is in path order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    entries: BTreeMap<String, EntryKind>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, replacing any entry with the same path.
    pub fn insert(&mut self, entry: FileSetEntry) {
        self.entries.insert(entry.path, entry.kind);
    }

    pub fn remove(&mut self, path: &str) -> Option<EntryKind> {
        self.entries.remove(path)
    }

    pub fn get(&self, path: &str) -> Option<EntryKind> {
        self.entries.get(path).copied()
    }

    pub fn contains(&self, entry: &FileSetEntry) -> bool {
        self.get(&entry.path) == Some(entry.kind)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = FileSetEntry> + '_ {
        self.entries.iter().map(|(path, kind)| FileSetEntry {
            path: path.clone(),
            kind: *kind,
        })
    }

    /// Relative paths of all file entries.
    pub fn files(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries
            .iter()
            .filter(|(_, kind)| **kind == EntryKind::File)
            .map(|(path, _)| path.as_str())
    }

    /// Entries strictly beneath the directory `dir`, in path order.
    pub fn entries_within(&self, dir: &str) -> Vec<FileSetEntry> {
        let prefix = format!("{dir}/");
        self.entries
            .range(prefix.clone()..)
            .take_while(|(path, _)| path.starts_with(&prefix))
            .map(|(path, kind)| FileSetEntry {
                path: path.clone(),
                kind: *kind,
            })
            .collect()
    }

    /// Entries of `self` that `other` lacks, or holds with a different kind.
    pub fn entries_not_in(&self, other: &Snapshot) -> Vec<FileSetEntry> {
        self.iter().filter(|e| !other.contains(e)).collect()
    }
}

impl FromIterator<FileSetEntry> for Snapshot {
    fn from_iter<T: IntoIterator<Item = FileSetEntry>>(iter: T) -> Self {
        let mut snap = Snapshot::new();
        for entry in iter {
            snap.insert(entry);
        }
        snap
    }
}

/// Walk `root` recursively and collect every entry whose relative path is
/// selected by `patterns`.
///
/// Directories are selected by their own path; excluded directories are
/// still descended into, since patterns are evaluated per path. Symlinked
/// directories are recorded as directory entries without walking their
/// contents. Any unreadable directory fails the whole walk.
pub fn snapshot(fs: &dyn FileSystem, root: &Path, patterns: &PatternSet) -> Result<Snapshot> {
    let snap = walk(fs, root, root, patterns)?;
    debug!(root = ?root, entries = snap.len(), "snapshot complete");
    Ok(snap)
}

/// Like [`snapshot`], but only walks the subtree at `sub_rel`. Paths in the
/// result stay relative to `root`.
pub fn snapshot_within(
    fs: &dyn FileSystem,
    root: &Path,
    sub_rel: &str,
    patterns: &PatternSet,
) -> Result<Snapshot> {
    walk(fs, root, &root.join(sub_rel), patterns)
}

fn walk(fs: &dyn FileSystem, root: &Path, start: &Path, patterns: &PatternSet) -> Result<Snapshot> {
    let mut snap = Snapshot::new();
    let mut stack: Vec<PathBuf> = vec![start.to_path_buf()];

    while let Some(dir) = stack.pop() {
        let children = fs.read_dir(&dir).map_err(|e| SyncError::io_at(&dir, e))?;

        for path in children {
            let kind = if fs.is_dir(&path) {
                // Linked directories are listed but never entered.
                if !fs.is_symlink(&path) {
                    stack.push(path.clone());
                }
                EntryKind::Directory
            } else if fs.is_file(&path) {
                EntryKind::File
            } else {
                continue;
            };

            let Ok(rel) = path.strip_prefix(root) else {
                continue;
            };
            let rel = rel.to_string_lossy().replace('\\', "/");

            if patterns.matches(&rel) {
                snap.insert(FileSetEntry { path: rel, kind });
            }
        }
    }

    Ok(snap)
}
