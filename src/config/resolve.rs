// src/config/resolve.rs

//! Turns a validated [`ConfigFile`] plus invocation overrides into the
//! [`PackSpec`]s the engine runs.

use std::path::{Path, PathBuf};

use crate::config::model::{ConfigFile, PackConfig, ScriptConfig};
use crate::errors::{Result, SyncError};
use crate::pack::{PackSpec, ScriptSpec};
use crate::watch::patterns::PatternLayer;

/// Settings given on the command line that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// Force watch mode for every pack.
    pub watch: bool,
    /// Extra exclude patterns, applied as the last layer.
    pub exclude: Vec<String>,
    /// Restrict the run to these packs; empty means all.
    pub packs: Vec<String>,
}

/// Resolve every selected pack. Relative directories are joined onto
/// `base_dir`. Packs come out in name order.
pub fn resolve_pack_specs(cfg: &ConfigFile, base_dir: &Path, overrides: &Overrides) -> Result<Vec<PackSpec>> {
    for name in &overrides.packs {
        if !cfg.pack.contains_key(name) {
            return Err(SyncError::ConfigError(format!(
                "unknown pack '{name}' (known: {})",
                cfg.pack.keys().cloned().collect::<Vec<_>>().join(", ")
            )));
        }
    }

    let specs: Vec<PackSpec> = cfg
        .pack
        .iter()
        .filter(|(name, _)| overrides.packs.is_empty() || overrides.packs.iter().any(|p| p == *name))
        .map(|(name, pack)| resolve_pack(cfg, name, pack, base_dir, overrides))
        .collect();

    // Validate the final pattern layers up front so bad CLI globs surface
    // before any pipeline starts.
    for spec in &specs {
        spec.pattern_set()?;
    }

    Ok(specs)
}

fn resolve_pack(
    cfg: &ConfigFile,
    name: &str,
    pack: &PackConfig,
    base_dir: &Path,
    overrides: &Overrides,
) -> PackSpec {
    let mut layers = vec![
        PatternLayer::new("build", cfg.build.include.clone(), cfg.build.exclude.clone()),
        PatternLayer::new("pack", pack.include.clone(), pack.exclude.clone()),
    ];
    if !overrides.exclude.is_empty() {
        layers.push(PatternLayer::new("cli", Vec::new(), overrides.exclude.clone()));
    }

    PackSpec {
        name: name.to_string(),
        kind: pack.kind,
        src_dir: resolve_dir(base_dir, &pack.src_dir),
        out_dir: resolve_dir(base_dir, &pack.out_dir),
        layers,
        remove_orphans: pack.effective_remove_orphans(&cfg.build),
        watch: overrides.watch || pack.effective_watch(&cfg.build),
        copy_policy: cfg.build.copy,
        artifacts: pack.artifacts(),
        script: pack.script.as_ref().map(|s| resolve_script(base_dir, s)),
    }
}

fn resolve_script(base_dir: &Path, script: &ScriptConfig) -> ScriptSpec {
    ScriptSpec {
        entry: script.entry.clone(),
        bundle: script.bundle,
        minify: script.minify,
        external: script.external.clone(),
        source_map: script.source_map,
        tsconfig: script.tsconfig.as_deref().map(|t| resolve_dir(base_dir, t)),
        banner: script.banner.clone(),
        footer: script.footer.clone(),
        command: script.command.clone(),
    }
}

fn resolve_dir(base_dir: &Path, dir: &str) -> PathBuf {
    let path = Path::new(dir);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}
