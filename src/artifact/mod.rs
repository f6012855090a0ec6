// src/artifact/mod.rs

//! Derived artifacts: generated files computed from the set of tracked
//! source paths (e.g. `textures/texture_list.json`).
//!
//! The registry is owned by one pipeline and only mutated from its event
//! loop; rendering is a pure function of the tracked set.

pub mod registry;
pub mod render;

pub use registry::{DerivedArtifactRegistry, ARTIFACT_DEBOUNCE};
pub use render::{entry_for, render_entries};
