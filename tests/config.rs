// tests/config.rs

mod common;
use crate::common::builders::{ConfigFileBuilder, PackConfigBuilder};

use std::path::Path;

use packsync::config::{config_root_dir, load_and_validate, load_from_path, resolve_pack_specs, ConfigFile, Overrides};
use packsync::errors::SyncError;
use packsync::pack::{TEXTURE_LIST_PATH, TEXTURE_LIST_TRIGGER};
use packsync::types::{ArtifactGenerator, CopyPolicy, PackKind};

const FULL_CONFIG: &str = r#"
[build]
exclude = ["**/*.psd"]
remove_orphans = true
copy = "changed"

[pack.bp]
kind = "behavior"
src_dir = "src/bp"
out_dir = "out/bp"
watch = true

[pack.bp.script]
entry = "scripts/main.ts"
bundle = true
tsconfig = "tsconfig.json"

[pack.rp]
kind = "resource"
src_dir = "src/rp"
out_dir = "/abs/out/rp"
include = ["textures/**", "sounds/**"]
remove_orphans = false
generate_texture_list = true

[[pack.rp.artifact]]
trigger = "sounds/**/*.ogg"
destination = "sounds/sound_list.json"
"#;

fn write_config(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Packsync.toml");
    std::fs::write(&path, contents).unwrap();
    (dir, path)
}

fn config_error(raw: packsync::config::RawConfigFile) -> String {
    match ConfigFile::try_from(raw) {
        Err(SyncError::ConfigError(msg)) => msg,
        other => panic!("expected ConfigError, got {other:?}"),
    }
}

#[test]
fn full_config_resolves_into_pack_specs() {
    let (_dir, path) = write_config(FULL_CONFIG);
    let cfg = load_and_validate(&path).unwrap();

    let specs = resolve_pack_specs(&cfg, Path::new("/project"), &Overrides::default()).unwrap();
    assert_eq!(specs.len(), 2);

    let bp = &specs[0];
    assert_eq!(bp.name, "bp");
    assert_eq!(bp.kind, PackKind::Behavior);
    assert_eq!(bp.src_dir, Path::new("/project/src/bp"));
    assert_eq!(bp.out_dir, Path::new("/project/out/bp"));
    assert!(bp.remove_orphans);
    assert!(bp.watch);
    assert_eq!(bp.copy_policy, CopyPolicy::Changed);
    let script = bp.script.as_ref().unwrap();
    assert!(script.bundle);
    assert_eq!(script.external, ["@minecraft"]);
    assert_eq!(script.command, "esbuild");
    assert_eq!(script.tsconfig.as_deref(), Some(Path::new("/project/tsconfig.json")));

    let patterns = bp.pattern_set().unwrap();
    assert_eq!(patterns.include(), ["**/*"]);
    assert_eq!(patterns.exclude(), ["**/*.psd", "manifest.json", "scripts", "scripts/**"]);

    let rp = &specs[1];
    assert_eq!(rp.out_dir, Path::new("/abs/out/rp"));
    assert!(!rp.remove_orphans);
    assert!(!rp.watch);
    assert_eq!(rp.artifacts.len(), 2);
    assert_eq!(rp.artifacts[0].trigger, TEXTURE_LIST_TRIGGER);
    assert_eq!(rp.artifacts[0].destination, TEXTURE_LIST_PATH);
    assert_eq!(rp.artifacts[1].generator, ArtifactGenerator::FileList);
    assert_eq!(
        rp.pattern_set().unwrap().exclude(),
        ["**/*.psd", "manifest.json", "textures/texture_list.json", "sounds/sound_list.json"]
    );
}

#[test]
fn overrides_force_watch_add_excludes_and_select_packs() {
    let (_dir, path) = write_config(FULL_CONFIG);
    let cfg = load_and_validate(&path).unwrap();
    let overrides = Overrides {
        watch: true,
        exclude: vec!["**/*.bak".to_string()],
        packs: vec!["rp".to_string()],
    };

    let specs = resolve_pack_specs(&cfg, Path::new("/project"), &overrides).unwrap();

    assert_eq!(specs.len(), 1);
    assert!(specs[0].watch);
    assert!(!specs[0].pattern_set().unwrap().matches("textures/a.bak"));
}

#[test]
fn unknown_pack_override_is_rejected() {
    let cfg = ConfigFileBuilder::new()
        .with_pack("bp", PackConfigBuilder::new("src", "out").build())
        .build();
    let overrides = Overrides {
        packs: vec!["nope".to_string()],
        ..Overrides::default()
    };

    let err = resolve_pack_specs(&cfg, Path::new("/p"), &overrides).unwrap_err();
    assert!(matches!(err, SyncError::ConfigError(msg) if msg.contains("nope")));
}

#[test]
fn invalid_cli_exclude_is_rejected() {
    let cfg = ConfigFileBuilder::new()
        .with_pack("bp", PackConfigBuilder::new("src", "out").build())
        .build();
    let overrides = Overrides {
        exclude: vec!["[".to_string()],
        ..Overrides::default()
    };

    assert!(resolve_pack_specs(&cfg, Path::new("/p"), &overrides).is_err());
}

#[test]
fn pack_settings_override_build_settings() {
    let cfg = ConfigFileBuilder::new()
        .remove_orphans(true)
        .watch(true)
        .with_pack("a", PackConfigBuilder::new("a", "out/a").build())
        .with_pack("b", PackConfigBuilder::new("b", "out/b").remove_orphans(false).watch(false).build())
        .build();

    let specs = resolve_pack_specs(&cfg, Path::new("/p"), &Overrides::default()).unwrap();

    assert!(specs[0].remove_orphans && specs[0].watch);
    assert!(!specs[1].remove_orphans && !specs[1].watch);
}

#[test]
fn config_without_packs_is_rejected() {
    let msg = config_error(ConfigFileBuilder::new().raw());
    assert!(msg.contains("at least one"), "{msg}");
}

#[test]
fn same_source_and_output_is_rejected() {
    let raw = ConfigFileBuilder::new()
        .with_pack("bp", PackConfigBuilder::new("dir", "dir").build())
        .raw();
    assert!(config_error(raw).contains("same directory"));
}

#[test]
fn empty_directories_are_rejected() {
    let raw = ConfigFileBuilder::new()
        .with_pack("bp", PackConfigBuilder::new("", "out").build())
        .raw();
    assert!(config_error(raw).contains("src_dir"));
}

#[test]
fn script_requires_behavior_pack() {
    let raw = ConfigFileBuilder::new()
        .with_pack(
            "rp",
            PackConfigBuilder::new("src", "out")
                .kind(PackKind::Resource)
                .script("scripts/main.ts")
                .build(),
        )
        .raw();
    assert!(config_error(raw).contains("behavior"));
}

#[test]
fn texture_list_requires_resource_pack() {
    let raw = ConfigFileBuilder::new()
        .with_pack("bp", PackConfigBuilder::new("src", "out").texture_list().build())
        .raw();
    assert!(config_error(raw).contains("resource"));
}

#[test]
fn invalid_glob_is_rejected() {
    let raw = ConfigFileBuilder::new()
        .with_global_exclude("a/[b")
        .with_pack("bp", PackConfigBuilder::new("src", "out").build())
        .raw();
    assert!(config_error(raw).contains("[build]"));
}

#[test]
fn artifact_destinations_must_be_relative_and_unique() {
    let (_dir, path) = write_config(
        r#"
[pack.rp]
kind = "resource"
src_dir = "src"
out_dir = "out"
generate_texture_list = true

[[pack.rp.artifact]]
trigger = "textures/**/*.tga"
destination = "textures/./texture_list.json"
"#,
    );
    let err = load_and_validate(&path).unwrap_err();
    assert!(matches!(&err, SyncError::ConfigError(msg) if msg.contains("more than once")), "{err:?}");

    let (_dir, path) = write_config(
        r#"
[pack.rp]
src_dir = "src"
out_dir = "out"

[[pack.rp.artifact]]
trigger = "**/*.json"
destination = "../escape.json"
"#,
    );
    let err = load_and_validate(&path).unwrap_err();
    assert!(matches!(&err, SyncError::ConfigError(msg) if msg.contains("relative")), "{err:?}");
}

#[test]
fn unknown_enum_value_is_a_toml_error() {
    let (_dir, path) = write_config(
        r#"
[pack.bp]
kind = "skin"
src_dir = "src"
out_dir = "out"
"#,
    );
    assert!(matches!(load_from_path(&path), Err(SyncError::TomlError(_))));
}

#[test]
fn missing_file_is_an_io_error() {
    let err = load_from_path("/definitely/not/here/Packsync.toml").unwrap_err();
    assert!(matches!(err, SyncError::IoError(_)), "got {err:?}");
}

#[test]
fn config_root_dir_is_absolute() {
    let cwd = std::env::current_dir().unwrap();

    assert_eq!(config_root_dir(Path::new("./Packsync.toml")).unwrap(), cwd);
    assert_eq!(config_root_dir(Path::new("Packsync.toml")).unwrap(), cwd);
    assert_eq!(config_root_dir(Path::new("packs/Packsync.toml")).unwrap(), cwd.join("packs"));
    assert_eq!(config_root_dir(Path::new("/etc/packs/Packsync.toml")).unwrap(), Path::new("/etc/packs"));
}
