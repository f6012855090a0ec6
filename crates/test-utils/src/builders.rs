#![allow(dead_code)]

use std::path::Path;

use packsync::config::{ConfigFile, PackConfig, RawConfigFile, ScriptConfig};
use packsync::pack::{ArtifactSpec, PackSpec, ScriptSpec};
use packsync::types::{CopyPolicy, PackKind};
use packsync::watch::PatternLayer;

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    pub fn with_pack(mut self, name: &str, pack: PackConfig) -> Self {
        self.config.pack.insert(name.to_string(), pack);
        self
    }

    pub fn with_global_include(mut self, pattern: &str) -> Self {
        self.config.build.include.push(pattern.to_string());
        self
    }

    pub fn with_global_exclude(mut self, pattern: &str) -> Self {
        self.config.build.exclude.push(pattern.to_string());
        self
    }

    pub fn remove_orphans(mut self, val: bool) -> Self {
        self.config.build.remove_orphans = val;
        self
    }

    pub fn watch(mut self, val: bool) -> Self {
        self.config.build.watch = val;
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `PackConfig`.
pub struct PackConfigBuilder {
    pack: PackConfig,
}

impl PackConfigBuilder {
    pub fn new(src_dir: &str, out_dir: &str) -> Self {
        Self {
            pack: PackConfig {
                kind: PackKind::Behavior,
                src_dir: src_dir.to_string(),
                out_dir: out_dir.to_string(),
                include: vec![],
                exclude: vec![],
                remove_orphans: None,
                watch: None,
                generate_texture_list: false,
                script: None,
                artifact: vec![],
            },
        }
    }

    pub fn kind(mut self, kind: PackKind) -> Self {
        self.pack.kind = kind;
        self
    }

    pub fn include(mut self, pattern: &str) -> Self {
        self.pack.include.push(pattern.to_string());
        self
    }

    pub fn exclude(mut self, pattern: &str) -> Self {
        self.pack.exclude.push(pattern.to_string());
        self
    }

    pub fn remove_orphans(mut self, val: bool) -> Self {
        self.pack.remove_orphans = Some(val);
        self
    }

    pub fn watch(mut self, val: bool) -> Self {
        self.pack.watch = Some(val);
        self
    }

    pub fn texture_list(mut self) -> Self {
        self.pack.generate_texture_list = true;
        self
    }

    pub fn script(mut self, entry: &str) -> Self {
        self.pack.script = Some(ScriptConfig {
            entry: entry.to_string(),
            bundle: false,
            minify: false,
            external: vec!["@minecraft".to_string()],
            source_map: false,
            tsconfig: None,
            banner: None,
            footer: None,
            command: "esbuild".to_string(),
        });
        self
    }

    pub fn build(self) -> PackConfig {
        self.pack
    }
}

/// Builder for resolved `PackSpec`s, for tests that bypass configuration.
pub struct PackSpecBuilder {
    spec: PackSpec,
}

impl PackSpecBuilder {
    pub fn new(name: &str, src_dir: impl AsRef<Path>, out_dir: impl AsRef<Path>) -> Self {
        Self {
            spec: PackSpec {
                name: name.to_string(),
                kind: PackKind::Behavior,
                src_dir: src_dir.as_ref().to_path_buf(),
                out_dir: out_dir.as_ref().to_path_buf(),
                layers: vec![],
                remove_orphans: false,
                watch: false,
                copy_policy: CopyPolicy::Always,
                artifacts: vec![],
                script: None,
            },
        }
    }

    pub fn kind(mut self, kind: PackKind) -> Self {
        self.spec.kind = kind;
        self
    }

    pub fn layer(mut self, name: &str, include: &[&str], exclude: &[&str]) -> Self {
        self.spec.layers.push(PatternLayer::new(
            name,
            include.iter().map(|s| s.to_string()).collect(),
            exclude.iter().map(|s| s.to_string()).collect(),
        ));
        self
    }

    pub fn remove_orphans(mut self, val: bool) -> Self {
        self.spec.remove_orphans = val;
        self
    }

    pub fn watch(mut self, val: bool) -> Self {
        self.spec.watch = val;
        self
    }

    pub fn copy_policy(mut self, policy: CopyPolicy) -> Self {
        self.spec.copy_policy = policy;
        self
    }

    pub fn artifact(mut self, artifact: ArtifactSpec) -> Self {
        self.spec.artifacts.push(artifact);
        self
    }

    pub fn script(mut self, entry: &str) -> Self {
        self.spec.script = Some(ScriptSpec {
            entry: entry.to_string(),
            bundle: true,
            minify: false,
            external: vec!["@minecraft".to_string()],
            source_map: false,
            tsconfig: None,
            banner: None,
            footer: None,
            command: "esbuild".to_string(),
        });
        self
    }

    pub fn build(self) -> PackSpec {
        self.spec
    }
}
