// tests/classifier.rs

mod common;
use crate::common::{mock_with_source, shared};

use std::path::{Path, PathBuf};

use packsync::fs::FileSystem;
use packsync::sync::{snapshot, FileSetEntry};
use packsync::watch::classify::ChangeClassifier;
use packsync::watch::{resolve_patterns, ChangeKind, PatternLayer, PatternSet};

fn patterns(exclude: &[&str]) -> PatternSet {
    resolve_patterns(
        &[PatternLayer::new(
            "pack",
            vec![],
            exclude.iter().map(|s| s.to_string()).collect(),
        )],
        &["manifest.json".to_string()],
    )
    .unwrap()
}

fn classifier(fs: &packsync::fs::mock::MockFileSystem, patterns: PatternSet) -> ChangeClassifier {
    let known = snapshot(fs, Path::new("/src"), &patterns).unwrap();
    ChangeClassifier::new(shared(fs), PathBuf::from("/src"), patterns, known)
}

fn kinds(events: &[packsync::watch::ChangeEvent]) -> Vec<(ChangeKind, &str)> {
    events.iter().map(|e| (e.kind, e.path.as_str())).collect()
}

#[test]
fn new_file_is_added_then_modified() {
    let fs = mock_with_source(&[("a.txt", "a")]);
    let mut c = classifier(&fs, patterns(&[]));

    fs.add_file("/src/b.txt", "b");
    assert_eq!(kinds(&c.classify("b.txt")), [(ChangeKind::Added, "b.txt")]);

    fs.add_file("/src/b.txt", "b2");
    assert_eq!(kinds(&c.classify("b.txt")), [(ChangeKind::Modified, "b.txt")]);
}

#[test]
fn rename_save_collapses_to_one_modification() {
    let fs = mock_with_source(&[("a.txt", "a")]);
    let mut c = classifier(&fs, patterns(&[]));

    // Editor writes a temp file, then renames it over the target. By the
    // time both paths settle the temp file is gone.
    fs.add_file("/src/a.txt", "a2");

    assert!(c.classify("a.txt.tmp~").is_empty());
    assert_eq!(kinds(&c.classify("a.txt")), [(ChangeKind::Modified, "a.txt")]);
}

#[test]
fn excluded_paths_produce_nothing() {
    let fs = mock_with_source(&[("a.txt", "a")]);
    let mut c = classifier(&fs, patterns(&["**/*.psd"]));

    fs.add_file("/src/art.psd", "p");
    fs.add_file("/src/manifest.json", "{}");

    assert!(c.classify("art.psd").is_empty());
    assert!(c.classify("manifest.json").is_empty());
}

#[test]
fn removed_directory_reports_contents_then_itself() {
    let fs = mock_with_source(&[("a.txt", "a"), ("d/x.txt", "x"), ("d/e/y.txt", "y")]);
    let mut c = classifier(&fs, patterns(&[]));

    fs.remove_all(Path::new("/src/d")).unwrap();

    assert_eq!(
        kinds(&c.classify("d")),
        [
            (ChangeKind::Removed, "d/e/y.txt"),
            (ChangeKind::Removed, "d/x.txt"),
            (ChangeKind::RemovedDir, "d/e"),
            (ChangeKind::RemovedDir, "d"),
        ]
    );
    assert!(c.known().get("d/x.txt").is_none());

    // A second notification for the same path is a no-op.
    assert!(c.classify("d").is_empty());
}

#[test]
fn moved_in_directory_announces_its_contents() {
    let fs = mock_with_source(&[("a.txt", "a")]);
    let mut c = classifier(&fs, patterns(&[]));

    fs.add_file("/src/new/x.txt", "x");
    fs.add_file("/src/new/sub/y.txt", "y");

    assert_eq!(
        kinds(&c.classify("new")),
        [
            (ChangeKind::AddedDir, "new"),
            (ChangeKind::AddedDir, "new/sub"),
            (ChangeKind::Added, "new/sub/y.txt"),
            (ChangeKind::Added, "new/x.txt"),
        ]
    );

    // The children's own notifications arrive later and change nothing new.
    assert_eq!(kinds(&c.classify("new/x.txt")), [(ChangeKind::Modified, "new/x.txt")]);
}

#[test]
fn file_replaced_by_directory() {
    let fs = mock_with_source(&[("thing", "file")]);
    let mut c = classifier(&fs, patterns(&[]));

    fs.remove_all(Path::new("/src/thing")).unwrap();
    fs.add_file("/src/thing/inner.txt", "i");

    assert_eq!(
        kinds(&c.classify("thing")),
        [
            (ChangeKind::Removed, "thing"),
            (ChangeKind::AddedDir, "thing"),
            (ChangeKind::Added, "thing/inner.txt"),
        ]
    );
    assert!(c.known().contains(&FileSetEntry::dir("thing")));
}
