// src/watch/classify.rs

//! Turns a settled path into typed change events.
//!
//! The classifier keeps the set of entries it believes exist (seeded from
//! the initial snapshot) and compares it with what the filesystem shows once
//! a path has settled. This is what makes rename-based saves collapse into a
//! single event: the temporary file is unknown and gone by the time it
//! settles, so it produces nothing, while the target yields one `Modified`.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::warn;

use crate::fs::FileSystem;
use crate::sync::snapshot::{snapshot_within, EntryKind, FileSetEntry, Snapshot};
use crate::watch::event::{ChangeEvent, ChangeKind};
use crate::watch::patterns::PatternSet;

#[derive(Debug)]
pub struct ChangeClassifier {
    fs: Arc<dyn FileSystem>,
    root: PathBuf,
    patterns: PatternSet,
    known: Snapshot,
}

impl ChangeClassifier {
    pub fn new(fs: Arc<dyn FileSystem>, root: PathBuf, patterns: PatternSet, known: Snapshot) -> Self {
        Self {
            fs,
            root,
            patterns,
            known,
        }
    }

    pub fn known(&self) -> &Snapshot {
        &self.known
    }

    /// Classify the current state of `rel_path` against the known entries and
    /// update them accordingly.
    pub fn classify(&mut self, rel_path: &str) -> Vec<ChangeEvent> {
        if rel_path.is_empty() {
            return Vec::new();
        }

        let abs = self.root.join(rel_path);
        let mut out = Vec::new();

        if self.fs.is_file(&abs) {
            if !self.patterns.admits(rel_path) {
                return out;
            }
            match self.known.get(rel_path) {
                Some(EntryKind::File) => out.push(ChangeEvent::modified(rel_path)),
                Some(EntryKind::Directory) => {
                    self.forget_tree(rel_path, &mut out);
                    self.known.insert(FileSetEntry::file(rel_path));
                    out.push(ChangeEvent::added(rel_path));
                }
                None => {
                    self.known.insert(FileSetEntry::file(rel_path));
                    out.push(ChangeEvent::added(rel_path));
                }
            }
        } else if self.fs.is_dir(&abs) {
            if self.known.get(rel_path) == Some(EntryKind::File) {
                self.known.remove(rel_path);
                out.push(ChangeEvent::removed(rel_path));
            }
            if self.patterns.admits(rel_path) && self.known.get(rel_path).is_none() {
                self.known.insert(FileSetEntry::dir(rel_path));
                out.push(ChangeEvent::new(ChangeKind::AddedDir, rel_path));
            }
            if !self.fs.is_symlink(&abs) {
                self.discover_within(rel_path, &mut out);
            }
        } else {
            match self.known.get(rel_path) {
                Some(EntryKind::File) => {
                    self.known.remove(rel_path);
                    out.push(ChangeEvent::removed(rel_path));
                }
                Some(EntryKind::Directory) => self.forget_tree(rel_path, &mut out),
                // An unselected directory may still contain selected entries.
                None => self.forget_contents(rel_path, &mut out),
            }
        }

        out
    }

    /// Emit additions for entries under a (possibly moved-in) directory that
    /// are not known yet.
    fn discover_within(&mut self, rel_dir: &str, out: &mut Vec<ChangeEvent>) {
        let found = match snapshot_within(self.fs.as_ref(), &self.root, rel_dir, &self.patterns) {
            Ok(snap) => snap,
            Err(err) => {
                warn!(path = %rel_dir, error = %err, "failed to scan new directory");
                return;
            }
        };

        for entry in found.iter() {
            if self.known.contains(&entry) {
                continue;
            }
            let kind = match entry.kind {
                EntryKind::File => ChangeKind::Added,
                EntryKind::Directory => ChangeKind::AddedDir,
            };
            out.push(ChangeEvent::new(kind, entry.path.clone()));
            self.known.insert(entry);
        }
    }

    /// Forget a known directory and everything beneath it.
    fn forget_tree(&mut self, rel_dir: &str, out: &mut Vec<ChangeEvent>) {
        self.forget_contents(rel_dir, out);
        self.known.remove(rel_dir);
        out.push(ChangeEvent::removed_dir(rel_dir));
    }

    /// Files first, then directories deepest first.
    fn forget_contents(&mut self, rel_dir: &str, out: &mut Vec<ChangeEvent>) {
        let within = self.known.entries_within(rel_dir);

        for entry in within.iter().filter(|e| e.kind == EntryKind::File) {
            self.known.remove(&entry.path);
            out.push(ChangeEvent::removed(entry.path.clone()));
        }
        for entry in within.iter().rev().filter(|e| e.kind == EntryKind::Directory) {
            self.known.remove(&entry.path);
            out.push(ChangeEvent::removed_dir(entry.path.clone()));
        }
    }
}
