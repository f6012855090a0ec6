// src/sync/mod.rs

//! Source → destination synchronization.
//!
//! - [`snapshot`] lists the entries of a tree selected by a `PatternSet`.
//! - [`mirror`] performs the full pass run when a pipeline starts.
//! - [`incremental`] applies single watcher events afterwards.

pub mod hash;
pub mod incremental;
pub mod mirror;
pub mod snapshot;

pub use incremental::IncrementalSync;
pub use mirror::{Mirror, SyncResult};
pub use snapshot::{snapshot, snapshot_within, EntryKind, FileSetEntry, Snapshot};
