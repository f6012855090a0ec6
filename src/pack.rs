// src/pack.rs

//! Resolved, immutable description of one sync pipeline.

use std::path::PathBuf;

use crate::errors::Result;
use crate::types::{ArtifactGenerator, CopyPolicy, PackKind};
use crate::watch::patterns::{resolve_patterns, PatternLayer, PatternSet};

/// Manifest written by the external manifest generator.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Subtree owned by the script bundler.
pub const SCRIPTS_DIR: &str = "scripts";

/// Trigger and destination of the generated texture list.
pub const TEXTURE_LIST_TRIGGER: &str = "textures/**/*.png";
pub const TEXTURE_LIST_PATH: &str = "textures/texture_list.json";

/// One sync pipeline: where to read, where to write, and what to select.
#[derive(Debug, Clone)]
pub struct PackSpec {
    pub name: String,
    pub kind: PackKind,
    /// Absolute source root.
    pub src_dir: PathBuf,
    /// Absolute destination root.
    pub out_dir: PathBuf,
    pub layers: Vec<PatternLayer>,
    pub remove_orphans: bool,
    pub watch: bool,
    pub copy_policy: CopyPolicy,
    pub artifacts: Vec<ArtifactSpec>,
    pub script: Option<ScriptSpec>,
}

/// A generated file whose content is a function of the tracked paths
/// matching `trigger`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactSpec {
    pub trigger: String,
    /// Destination path relative to the pack's output root.
    pub destination: String,
    pub generator: ArtifactGenerator,
}

impl ArtifactSpec {
    pub fn texture_list() -> Self {
        Self {
            trigger: TEXTURE_LIST_TRIGGER.to_string(),
            destination: TEXTURE_LIST_PATH.to_string(),
            generator: ArtifactGenerator::TextureList,
        }
    }
}

/// Options handed to the script bundler for a behavior pack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptSpec {
    /// Entry point, relative to the pack source root.
    pub entry: String,
    pub bundle: bool,
    pub minify: bool,
    pub external: Vec<String>,
    pub source_map: bool,
    pub tsconfig: Option<PathBuf>,
    pub banner: Option<String>,
    pub footer: Option<String>,
    /// Bundler executable, e.g. `esbuild`.
    pub command: String,
}

impl PackSpec {
    /// Exclusions that always apply because other components own these
    /// paths: the manifest, the bundler's `scripts/` subtree and every
    /// derived artifact.
    pub fn structural_excludes(&self) -> Vec<String> {
        let mut out = vec![MANIFEST_FILE.to_string()];
        if self.script.is_some() {
            // The directory itself too, so its removal is never mirrored.
            out.push(SCRIPTS_DIR.to_string());
            out.push(format!("{SCRIPTS_DIR}/**"));
        }
        for artifact in &self.artifacts {
            out.push(artifact.destination.clone());
        }
        out
    }

    /// Resolve this pack's layers into the effective [`PatternSet`].
    pub fn pattern_set(&self) -> Result<PatternSet> {
        resolve_patterns(&self.layers, &self.structural_excludes())
    }

    /// Destination directory written by the script bundler.
    pub fn scripts_out_dir(&self) -> PathBuf {
        self.out_dir.join(SCRIPTS_DIR)
    }
}
