// tests/watch_pipeline.rs

mod common;
use crate::common::builders::PackSpecBuilder;
use crate::common::{init_tracing, FakeBundler};

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use packsync::engine::{shutdown_channel, Pipeline};
use packsync::fs::RealFileSystem;
use packsync::pack::ArtifactSpec;
use packsync::types::PackKind;
use packsync::watch::WatchOptions;

fn fast_options() -> WatchOptions {
    WatchOptions {
        stability_threshold: Duration::from_millis(50),
        poll_interval: Duration::from_millis(10),
    }
}

async fn wait_until(what: &str, mut cond: impl FnMut() -> bool) {
    let waited = tokio::time::timeout(Duration::from_secs(10), async {
        while !cond() {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await;
    assert!(waited.is_ok(), "timed out waiting for {what}");
}

fn read(path: &Path) -> Option<String> {
    fs::read_to_string(path).ok()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn watch_mode_applies_changes_until_shutdown() {
    init_tracing();

    let tmp = tempfile::tempdir().unwrap();
    let src = tmp.path().join("src");
    let out = tmp.path().join("out");
    fs::create_dir_all(src.join("textures")).unwrap();
    fs::write(src.join("a.txt"), "a").unwrap();
    fs::write(src.join("textures/a.png"), "png-a").unwrap();

    let spec = PackSpecBuilder::new("rp", &src, &out)
        .kind(PackKind::Resource)
        .remove_orphans(true)
        .watch(true)
        .artifact(ArtifactSpec::texture_list())
        .build();

    let (trigger, signal) = shutdown_channel();
    let pipeline = Pipeline::new(spec, Arc::new(RealFileSystem), Arc::new(FakeBundler::new()))
        .with_watch_options(fast_options())
        .with_artifact_delay(Duration::from_millis(50));
    let handle = tokio::spawn(pipeline.run(signal));

    let list = out.join("textures/texture_list.json");
    wait_until("initial texture list", || read(&list).as_deref() == Some("[\n  \"textures/a\"\n]")).await;
    // Give the watcher time to register after the initial pass.
    tokio::time::sleep(Duration::from_millis(500)).await;

    fs::write(src.join("b.txt"), "b").unwrap();
    fs::remove_file(src.join("textures/a.png")).unwrap();
    fs::write(src.join("textures/b.png"), "png-b").unwrap();
    fs::create_dir_all(src.join("models/entity")).unwrap();
    fs::write(src.join("models/entity/pig.json"), "{}").unwrap();

    wait_until("b.txt mirrored", || read(&out.join("b.txt")).as_deref() == Some("b")).await;
    wait_until("a.png removed", || !out.join("textures/a.png").exists()).await;
    wait_until("moved-in tree mirrored", || out.join("models/entity/pig.json").is_file()).await;
    wait_until("texture list regenerated", || {
        read(&list).as_deref() == Some("[\n  \"textures/b\"\n]")
    })
    .await;

    fs::write(src.join("a.txt"), "a2").unwrap();
    wait_until("a.txt updated", || read(&out.join("a.txt")).as_deref() == Some("a2")).await;

    trigger.trigger();
    let report = tokio::time::timeout(Duration::from_secs(10), handle)
        .await
        .expect("pipeline did not stop after shutdown")
        .unwrap()
        .unwrap();

    assert!(report.is_clean(), "{:?}", report.errors);
    assert!(report.events_applied >= 5, "applied {}", report.events_applied);
    assert_eq!(report.event_errors, 0);

    // Nothing is written after shutdown.
    fs::write(src.join("late.txt"), "late").unwrap();
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(!out.join("late.txt").exists());
}

#[tokio::test]
async fn shutdown_before_any_change_stops_cleanly() {
    init_tracing();

    let tmp = tempfile::tempdir().unwrap();
    let src = tmp.path().join("src");
    let out = tmp.path().join("out");
    fs::create_dir_all(&src).unwrap();
    fs::write(src.join("a.txt"), "a").unwrap();

    let spec = PackSpecBuilder::new("bp", &src, &out)
        .watch(true)
        .script("scripts/main.ts")
        .build();
    let bundler = FakeBundler::new();

    let (trigger, signal) = shutdown_channel();
    let pipeline = Pipeline::new(spec, Arc::new(RealFileSystem), Arc::new(bundler.clone()))
        .with_watch_options(fast_options());
    let handle = tokio::spawn(pipeline.run(signal));

    wait_until("initial sync", || out.join("a.txt").is_file()).await;
    trigger.trigger();

    let report = tokio::time::timeout(Duration::from_secs(10), handle)
        .await
        .expect("pipeline did not stop after shutdown")
        .unwrap()
        .unwrap();

    assert!(report.is_clean());
    assert_eq!(report.copied, 1);
    assert_eq!(report.events_applied, 0);

    // The watch-mode bundler waited for the same shutdown.
    let requests = bundler.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].watch);
}
