// src/watch/event.rs

//! Normalized change events produced by the watcher.

use std::fmt;
use std::time::SystemTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    Added,
    AddedDir,
    Modified,
    Removed,
    RemovedDir,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ChangeKind::Added => "added",
            ChangeKind::AddedDir => "addedDir",
            ChangeKind::Modified => "modified",
            ChangeKind::Removed => "removed",
            ChangeKind::RemovedDir => "removedDir",
        };
        f.write_str(s)
    }
}

/// One logical change to a path relative to the watched root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub kind: ChangeKind,
    pub path: String,
    pub at: SystemTime,
}

impl ChangeEvent {
    pub fn new(kind: ChangeKind, path: impl Into<String>) -> Self {
        Self {
            kind,
            path: path.into(),
            at: SystemTime::now(),
        }
    }

    pub fn added(path: impl Into<String>) -> Self {
        Self::new(ChangeKind::Added, path)
    }

    pub fn modified(path: impl Into<String>) -> Self {
        Self::new(ChangeKind::Modified, path)
    }

    pub fn removed(path: impl Into<String>) -> Self {
        Self::new(ChangeKind::Removed, path)
    }

    pub fn removed_dir(path: impl Into<String>) -> Self {
        Self::new(ChangeKind::RemovedDir, path)
    }
}
