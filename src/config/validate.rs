// src/config/validate.rs

use std::collections::BTreeSet;
use std::path::Path;

use crate::config::model::{ConfigFile, PackConfig, RawConfigFile};
use crate::errors::{Result, SyncError};
use crate::types::PackKind;
use crate::watch::path_utils::normalize_rel;
use crate::watch::patterns::compile_glob;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = SyncError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.build, raw.pack))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    ensure_has_packs(cfg)?;
    validate_globs("[build]", &cfg.build.include, &cfg.build.exclude)?;
    for (name, pack) in cfg.pack.iter() {
        validate_pack(name, pack)?;
    }
    Ok(())
}

fn ensure_has_packs(cfg: &RawConfigFile) -> Result<()> {
    if cfg.pack.is_empty() {
        return Err(SyncError::ConfigError(
            "config must contain at least one [pack.<name>] section".to_string(),
        ));
    }
    Ok(())
}

fn validate_pack(name: &str, pack: &PackConfig) -> Result<()> {
    if pack.src_dir.trim().is_empty() {
        return Err(SyncError::ConfigError(format!("pack '{name}' has an empty src_dir")));
    }
    if pack.out_dir.trim().is_empty() {
        return Err(SyncError::ConfigError(format!("pack '{name}' has an empty out_dir")));
    }
    if Path::new(&pack.src_dir) == Path::new(&pack.out_dir) {
        return Err(SyncError::ConfigError(format!(
            "pack '{name}' uses the same directory '{}' as source and output",
            pack.src_dir
        )));
    }

    if pack.script.is_some() && pack.kind != PackKind::Behavior {
        return Err(SyncError::ConfigError(format!(
            "pack '{name}' declares a script but is not a behavior pack"
        )));
    }
    if let Some(script) = &pack.script {
        if script.entry.trim().is_empty() {
            return Err(SyncError::ConfigError(format!(
                "pack '{name}' has an empty script entry"
            )));
        }
    }
    if pack.generate_texture_list && pack.kind != PackKind::Resource {
        return Err(SyncError::ConfigError(format!(
            "pack '{name}' generates a texture list but is not a resource pack"
        )));
    }

    validate_globs(&format!("pack '{name}'"), &pack.include, &pack.exclude)?;
    validate_artifacts(name, pack)
}

fn validate_globs(owner: &str, include: &[String], exclude: &[String]) -> Result<()> {
    for pattern in include.iter().chain(exclude) {
        compile_glob(pattern).map_err(|e| in_context(owner, e))?;
    }
    Ok(())
}

fn validate_artifacts(name: &str, pack: &PackConfig) -> Result<()> {
    let mut seen = BTreeSet::new();

    for artifact in pack.artifacts() {
        compile_glob(&artifact.trigger)
            .map_err(|e| in_context(&format!("pack '{name}' artifact trigger"), e))?;

        let dest = &artifact.destination;
        if dest.trim().is_empty()
            || Path::new(dest).is_absolute()
            || dest.starts_with('/')
            || dest.split(['/', '\\']).any(|seg| seg == "..")
        {
            return Err(SyncError::ConfigError(format!(
                "pack '{name}' artifact destination '{dest}' must be a relative path inside the output directory"
            )));
        }

        if !seen.insert(normalize_rel(dest)) {
            return Err(SyncError::ConfigError(format!(
                "pack '{name}' declares artifact destination '{dest}' more than once"
            )));
        }
    }

    Ok(())
}

fn in_context(owner: &str, err: SyncError) -> SyncError {
    match err {
        SyncError::ConfigError(msg) => SyncError::ConfigError(format!("{owner}: {msg}")),
        other => other,
    }
}
