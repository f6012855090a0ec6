// src/config/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::pack::ArtifactSpec;
use crate::types::{ArtifactGenerator, CopyPolicy, PackKind};

/// Top-level configuration as read from a TOML file, before validation.
///
/// ```toml
/// [build]
/// exclude = ["**/*.psd"]
/// remove_orphans = true
///
/// [pack.bp]
/// kind = "behavior"
/// src_dir = "src/bp"
/// out_dir = "out/bp"
///
/// [pack.bp.script]
/// entry = "scripts/main.ts"
/// bundle = true
///
/// [pack.rp]
/// kind = "resource"
/// src_dir = "src/rp"
/// out_dir = "out/rp"
/// generate_texture_list = true
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawConfigFile {
    #[serde(default)]
    pub build: BuildSection,

    /// All packs from `[pack.<name>]`, keyed by pack name.
    #[serde(default)]
    pub pack: BTreeMap<String, PackConfig>,
}

/// Validated configuration. Only obtainable through `TryFrom<RawConfigFile>`
/// (or [`ConfigFile::new_unchecked`] in tests).
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub build: BuildSection,
    pub pack: BTreeMap<String, PackConfig>,
}

impl ConfigFile {
    pub fn new_unchecked(build: BuildSection, pack: BTreeMap<String, PackConfig>) -> Self {
        Self { build, pack }
    }
}

/// `[build]` section: settings shared by every pack.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct BuildSection {
    /// Global include layer.
    #[serde(default)]
    pub include: Vec<String>,

    /// Global exclude layer.
    #[serde(default)]
    pub exclude: Vec<String>,

    #[serde(default)]
    pub remove_orphans: bool,

    #[serde(default)]
    pub watch: bool,

    #[serde(default)]
    pub copy: CopyPolicy,
}

/// `[pack.<name>]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct PackConfig {
    #[serde(default)]
    pub kind: PackKind,

    pub src_dir: String,

    pub out_dir: String,

    /// Pack include layer.
    #[serde(default)]
    pub include: Vec<String>,

    /// Pack exclude layer.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// If `None`, falls back to `[build].remove_orphans`.
    #[serde(default)]
    pub remove_orphans: Option<bool>,

    /// If `None`, falls back to `[build].watch`.
    #[serde(default)]
    pub watch: Option<bool>,

    /// Resource packs only: maintain `textures/texture_list.json`.
    #[serde(default)]
    pub generate_texture_list: bool,

    /// Behavior packs only.
    #[serde(default)]
    pub script: Option<ScriptConfig>,

    /// Additional derived artifacts from `[[pack.<name>.artifact]]`.
    #[serde(default)]
    pub artifact: Vec<ArtifactConfig>,
}

impl PackConfig {
    pub fn effective_remove_orphans(&self, build: &BuildSection) -> bool {
        self.remove_orphans.unwrap_or(build.remove_orphans)
    }

    pub fn effective_watch(&self, build: &BuildSection) -> bool {
        self.watch.unwrap_or(build.watch)
    }

    /// Every derived artifact of this pack, the texture list first.
    pub fn artifacts(&self) -> Vec<ArtifactSpec> {
        let mut out = Vec::with_capacity(self.artifact.len() + 1);
        if self.generate_texture_list {
            out.push(ArtifactSpec::texture_list());
        }
        out.extend(self.artifact.iter().map(|a| ArtifactSpec {
            trigger: a.trigger.clone(),
            destination: a.destination.clone(),
            generator: a.generator,
        }));
        out
    }
}

/// `[pack.<name>.script]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ScriptConfig {
    /// Entry point relative to the pack source root.
    pub entry: String,

    #[serde(default)]
    pub bundle: bool,

    #[serde(default)]
    pub minify: bool,

    /// Modules left external when bundling.
    #[serde(default = "default_external")]
    pub external: Vec<String>,

    #[serde(default)]
    pub source_map: bool,

    #[serde(default)]
    pub tsconfig: Option<String>,

    #[serde(default)]
    pub banner: Option<String>,

    #[serde(default)]
    pub footer: Option<String>,

    #[serde(default = "default_command")]
    pub command: String,
}

fn default_external() -> Vec<String> {
    vec!["@minecraft".to_string()]
}

fn default_command() -> String {
    "esbuild".to_string()
}

/// `[[pack.<name>.artifact]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct ArtifactConfig {
    pub trigger: String,
    pub destination: String,
    #[serde(default = "default_generator")]
    pub generator: ArtifactGenerator,
}

fn default_generator() -> ArtifactGenerator {
    ArtifactGenerator::FileList
}
