// src/watch/mod.rs

//! File watching and change detection.
//!
//! This module is responsible for:
//! - Resolving layered include/exclude globs into a `PatternSet`.
//! - Wiring up a cross-platform filesystem watcher (`notify`).
//! - Debouncing raw notifications per path and classifying the settled
//!   result into typed `ChangeEvent`s.
//!
//! It does **not** touch the destination tree; consumers apply the events.

pub mod classify;
pub mod debounce;
pub mod event;
pub mod path_utils;
pub mod patterns;
pub mod watcher;

pub use event::{ChangeEvent, ChangeKind};
pub use patterns::{compile_glob, resolve_patterns, PatternLayer, PatternSet, DEFAULT_INCLUDE};
pub use watcher::{ChangeStream, ChangeWatcher, WatchOptions, WatcherState};
