// src/types.rs

use serde::Deserialize;

/// Which kind of pack a pipeline builds.
///
/// - `Behavior`: may declare a script pipeline; its `scripts/` subtree then
///   belongs to the bundler.
/// - `Resource`: may generate a texture list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackKind {
    Behavior,
    Resource,
}

impl Default for PackKind {
    fn default() -> Self {
        PackKind::Behavior
    }
}

/// How the initial mirror pass treats files that already exist in the
/// destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CopyPolicy {
    /// Overwrite every destination file (source is authoritative).
    Always,
    /// Skip files whose content already matches (blake3 comparison).
    Changed,
}

impl Default for CopyPolicy {
    fn default() -> Self {
        CopyPolicy::Always
    }
}

/// Content generator for a derived artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactGenerator {
    /// Each tracked path without its file extension, e.g. `textures/a.png`
    /// becomes `textures/a`.
    TextureList,
    /// Each tracked path verbatim.
    FileList,
}
