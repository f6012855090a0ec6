// src/watch/patterns.rs

use std::fmt;

use globset::{Glob, GlobBuilder, GlobMatcher, GlobSet, GlobSetBuilder};

use crate::errors::{Result, SyncError};

/// Include pattern used when no layer contributes any include pattern.
pub const DEFAULT_INCLUDE: &str = "**/*";

/// One configuration layer's include/exclude lists.
///
/// Layers are resolved in the order given (global `[build]`, then the pack,
/// then command-line overrides); because both lists are unions the order only
/// affects how the effective lists are printed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternLayer {
    pub name: String,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

impl PatternLayer {
    pub fn new(name: impl Into<String>, include: Vec<String>, exclude: Vec<String>) -> Self {
        Self {
            name: name.into(),
            include,
            exclude,
        }
    }
}

/// Effective, compiled include/exclude globs for one pack.
///
/// Paths passed to [`PatternSet::matches`] are relative to the pack root and
/// use forward slashes, e.g. `"textures/blocks/stone.png"`.
#[derive(Clone)]
pub struct PatternSet {
    include: Vec<String>,
    exclude: Vec<String>,
    include_set: GlobSet,
    exclude_set: Option<GlobSet>,
}

impl fmt::Debug for PatternSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatternSet")
            .field("include", &self.include)
            .field("exclude", &self.exclude)
            .finish_non_exhaustive()
    }
}

impl PatternSet {
    pub fn include(&self) -> &[String] {
        &self.include
    }

    pub fn exclude(&self) -> &[String] {
        &self.exclude
    }

    /// True if `rel_path` matches any include pattern and no exclude pattern.
    pub fn matches(&self, rel_path: &str) -> bool {
        if !self.include_set.is_match(rel_path) {
            return false;
        }
        if let Some(exclude) = &self.exclude_set {
            if exclude.is_match(rel_path) {
                return false;
            }
        }
        true
    }

    /// Like [`matches`](Self::matches), but the root itself (`""`) is always
    /// admitted so the watcher can observe its direct children.
    pub fn admits(&self, rel_path: &str) -> bool {
        rel_path.is_empty() || self.matches(rel_path)
    }
}

/// Merge the layers into one effective [`PatternSet`].
///
/// - Includes from every layer are concatenated; if none remain the default
///   [`DEFAULT_INCLUDE`] is used.
/// - Excludes from every layer are concatenated, then `structural` is
///   appended unconditionally.
pub fn resolve_patterns(layers: &[PatternLayer], structural: &[String]) -> Result<PatternSet> {
    let mut include: Vec<String> = Vec::new();
    let mut exclude: Vec<String> = Vec::new();

    for layer in layers {
        include.extend(layer.include.iter().cloned());
        exclude.extend(layer.exclude.iter().cloned());
    }

    if include.is_empty() {
        include.push(DEFAULT_INCLUDE.to_string());
    }

    for pat in structural {
        if !exclude.contains(pat) {
            exclude.push(pat.clone());
        }
    }

    let include_set = build_globset(&include)?;
    let exclude_set = if exclude.is_empty() {
        None
    } else {
        Some(build_globset(&exclude)?)
    };

    Ok(PatternSet {
        include,
        exclude,
        include_set,
        exclude_set,
    })
}

/// Compile a single glob with the matching rules used everywhere in this
/// crate: `*` stays within one path segment, `**` spans segments.
pub fn compile_glob(pattern: &str) -> Result<GlobMatcher> {
    Ok(build_glob(pattern)?.compile_matcher())
}

fn build_glob(pattern: &str) -> Result<Glob> {
    GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map_err(|e| SyncError::ConfigError(format!("invalid glob pattern {pattern:?}: {e}")))
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        builder.add(build_glob(pat)?);
    }
    builder
        .build()
        .map_err(|e| SyncError::ConfigError(format!("building glob set: {e}")))
}
