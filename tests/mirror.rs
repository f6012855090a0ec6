// tests/mirror.rs

mod common;
use crate::common::builders::PackSpecBuilder;
use crate::common::{mock_with_source, shared};

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use packsync::errors::SyncError;
use packsync::fs::mock::MockFileSystem;
use packsync::fs::{FileSystem, RealFileSystem};
use packsync::sync::{snapshot, Mirror};
use packsync::types::CopyPolicy;

fn spec(remove_orphans: bool) -> packsync::pack::PackSpec {
    PackSpecBuilder::new("bp", "/src", "/out")
        .remove_orphans(remove_orphans)
        .build()
}

#[test]
fn mirror_copies_selected_files_and_dirs() {
    let fs = mock_with_source(&[("a.txt", "a"), ("b/b.txt", "b"), ("manifest.json", "{}")]);
    fs.add_dir("/src/empty");
    let spec = PackSpecBuilder::new("bp", "/src", "/out")
        .layer("pack", &["**/*"], &["b/**"])
        .build();

    let result = Mirror::new(shared(&fs)).sync(&spec.pattern_set().unwrap(), &spec).unwrap();

    assert!(result.is_clean());
    assert_eq!(result.copied, 1);
    assert_eq!(fs.contents("/out/a.txt").as_deref(), Some(&b"a"[..]));
    assert!(fs.is_dir(Path::new("/out/b")));
    assert!(fs.is_dir(Path::new("/out/empty")));
    assert!(fs.contents("/out/b/b.txt").is_none());
    assert!(fs.contents("/out/manifest.json").is_none());
}

#[test]
fn orphan_survives_without_removal() {
    let fs = mock_with_source(&[("a.txt", "a")]);
    fs.add_file("/out/old.txt", "old");

    let spec = spec(false);
    let result = Mirror::new(shared(&fs)).sync(&spec.pattern_set().unwrap(), &spec).unwrap();

    assert_eq!(result.removed_orphans, 0);
    assert!(fs.contents("/out/old.txt").is_some());
}

#[test]
fn orphan_is_deleted_with_removal() {
    let fs = mock_with_source(&[("a.txt", "a")]);
    fs.add_file("/out/old.txt", "old");
    fs.add_file("/out/gone/deep/x.txt", "x");

    let spec = spec(true);
    let result = Mirror::new(shared(&fs)).sync(&spec.pattern_set().unwrap(), &spec).unwrap();

    // gone, gone/deep, gone/deep/x.txt and old.txt
    assert_eq!(result.removed_orphans, 4);
    assert!(fs.contents("/out/old.txt").is_none());
    assert!(!fs.is_dir(Path::new("/out/gone")));
    assert_eq!(fs.contents("/out/a.txt").as_deref(), Some(&b"a"[..]));
}

#[test]
fn destination_equals_source_after_removal() {
    let fs = mock_with_source(&[("a.txt", "a"), ("t/x.png", "x"), ("t/y/z.png", "z")]);
    fs.add_file("/out/stale.txt", "s");
    fs.add_file("/out/t/old.png", "o");

    let spec = spec(true);
    let patterns = spec.pattern_set().unwrap();
    Mirror::new(shared(&fs)).sync(&patterns, &spec).unwrap();

    let src = snapshot(&fs, Path::new("/src"), &patterns).unwrap();
    let out = snapshot(&fs, Path::new("/out"), &patterns).unwrap();
    assert_eq!(src, out);
}

#[test]
fn structural_excludes_are_never_orphans() {
    let fs = mock_with_source(&[("a.txt", "a")]);
    fs.add_file("/out/manifest.json", "{}");
    fs.add_file("/out/scripts/main.js", "bundled");

    let spec = PackSpecBuilder::new("bp", "/src", "/out")
        .remove_orphans(true)
        .script("scripts/main.ts")
        .build();
    let result = Mirror::new(shared(&fs)).sync(&spec.pattern_set().unwrap(), &spec).unwrap();

    assert_eq!(result.removed_orphans, 0);
    assert!(fs.contents("/out/manifest.json").is_some());
    assert!(fs.contents("/out/scripts/main.js").is_some());
}

#[test]
fn second_run_is_idempotent() {
    let fs = mock_with_source(&[("a.txt", "a"), ("b/c.txt", "c")]);
    let spec = spec(true);
    let patterns = spec.pattern_set().unwrap();
    let mirror = Mirror::new(shared(&fs));

    mirror.sync(&patterns, &spec).unwrap();
    let before = snapshot(&fs, Path::new("/out"), &patterns).unwrap();

    let second = mirror.sync(&patterns, &spec).unwrap();
    let after = snapshot(&fs, Path::new("/out"), &patterns).unwrap();

    assert_eq!(second.removed_orphans, 0);
    assert_eq!(before, after);
    assert_eq!(fs.contents("/out/b/c.txt").as_deref(), Some(&b"c"[..]));
}

#[test]
fn changed_policy_skips_identical_files() {
    let fs = mock_with_source(&[("a.txt", "a"), ("b.txt", "b")]);
    let spec = PackSpecBuilder::new("bp", "/src", "/out")
        .remove_orphans(true)
        .copy_policy(CopyPolicy::Changed)
        .build();
    let patterns = spec.pattern_set().unwrap();
    let mirror = Mirror::new(shared(&fs));

    let first = mirror.sync(&patterns, &spec).unwrap();
    assert_eq!(first.copied, 2);

    fs.add_file("/src/b.txt", "b2");
    let second = mirror.sync(&patterns, &spec).unwrap();

    assert_eq!(second.copied, 1);
    assert_eq!(second.unchanged, 1);
    assert_eq!(second.removed_orphans, 0);
    assert_eq!(fs.contents("/out/b.txt").as_deref(), Some(&b"b2"[..]));

    let third = mirror.sync(&patterns, &spec).unwrap();
    assert_eq!(third.copied, 0);
}

#[test]
fn copy_failures_are_collected_per_file() {
    let fs = mock_with_source(&[("a.txt", "a"), ("bad.txt", "b"), ("c.txt", "c")]);
    fs.deny("/src/bad.txt");

    let spec = spec(false);
    let result = Mirror::new(shared(&fs)).sync(&spec.pattern_set().unwrap(), &spec).unwrap();

    assert_eq!(result.copied, 2);
    assert_eq!(result.errors.len(), 1);
    assert!(
        matches!(&result.errors[0], SyncError::CopyError { path, .. } if path == Path::new("/src/bad.txt")),
        "got {:?}",
        result.errors
    );
    assert!(fs.contents("/out/c.txt").is_some());
}

#[test]
fn delete_failures_are_collected() {
    let fs = mock_with_source(&[("a.txt", "a")]);
    fs.add_file("/out/stuck.txt", "s");
    fs.deny("/out/stuck.txt");

    let spec = spec(true);
    let result = Mirror::new(shared(&fs)).sync(&spec.pattern_set().unwrap(), &spec).unwrap();

    assert_eq!(result.removed_orphans, 0);
    assert!(matches!(&result.errors[..], [SyncError::DeleteError { .. }]));
}

#[test]
fn missing_source_root_fails_the_pass() {
    let fs = MockFileSystem::new();
    let spec = spec(true);

    let err = Mirror::new(shared(&fs)).sync(&spec.pattern_set().unwrap(), &spec).unwrap_err();

    assert!(matches!(err, SyncError::IoError(_)), "got {err:?}");
}

#[test]
fn mirror_on_real_filesystem() {
    let tmp = tempfile::tempdir().unwrap();
    let src = tmp.path().join("src");
    let out = tmp.path().join("out");
    fs::create_dir_all(src.join("textures/blocks")).unwrap();
    fs::create_dir_all(src.join("empty")).unwrap();
    fs::write(src.join("textures/blocks/stone.png"), b"\x89PNG").unwrap();
    fs::write(src.join("pack_icon.png"), b"icon").unwrap();
    fs::write(src.join("manifest.json"), b"{}").unwrap();
    fs::create_dir_all(&out).unwrap();
    fs::write(out.join("orphan.txt"), b"x").unwrap();

    let spec = PackSpecBuilder::new("rp", &src, &out).remove_orphans(true).build();
    let result = Mirror::new(Arc::new(RealFileSystem))
        .sync(&spec.pattern_set().unwrap(), &spec)
        .unwrap();

    assert!(result.is_clean(), "{:?}", result.errors);
    assert_eq!(result.copied, 2);
    assert_eq!(result.removed_orphans, 1);
    assert_eq!(fs::read(out.join("textures/blocks/stone.png")).unwrap(), b"\x89PNG");
    assert!(out.join("empty").is_dir());
    assert!(!out.join("manifest.json").exists());
    assert!(!out.join("orphan.txt").exists());

    let listing: BTreeMap<_, _> = snapshot(&RealFileSystem, &out, &spec.pattern_set().unwrap())
        .unwrap()
        .iter()
        .map(|e| (e.path, e.kind))
        .collect();
    assert_eq!(listing.len(), 5);
}

#[cfg(unix)]
#[test]
fn mirror_does_not_descend_into_linked_directories() {
    let tmp = tempfile::tempdir().unwrap();
    let src = tmp.path().join("src");
    let out = tmp.path().join("out");
    fs::create_dir_all(&src).unwrap();
    fs::write(src.join("a.txt"), b"a").unwrap();
    std::os::unix::fs::symlink(&src, src.join("loop")).unwrap();

    let spec = PackSpecBuilder::new("rp", &src, &out).build();
    let patterns = spec.pattern_set().unwrap();

    let listing: Vec<_> = snapshot(&RealFileSystem, &src, &patterns)
        .unwrap()
        .iter()
        .map(|e| e.path)
        .collect();
    assert_eq!(listing, vec!["a.txt".to_string(), "loop".to_string()]);

    let result = Mirror::new(Arc::new(RealFileSystem)).sync(&patterns, &spec).unwrap();

    assert!(result.is_clean(), "{:?}", result.errors);
    assert_eq!(result.copied, 1);
    assert!(out.join("loop").is_dir());
    assert!(!out.join("loop/a.txt").exists());
}
