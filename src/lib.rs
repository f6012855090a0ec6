// src/lib.rs

pub mod artifact;
pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod pack;
pub mod sync;
pub mod types;
pub mod watch;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Result};
use tracing::{debug, info, warn};

use crate::cli::CliArgs;
use crate::config::{config_root_dir, load_and_validate, resolve_pack_specs, Overrides};
use crate::engine::{shutdown_channel, BuildOrchestrator};
use crate::exec::CommandBundler;
use crate::fs::RealFileSystem;
use crate::pack::PackSpec;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading and pack resolution
/// - the build orchestrator with the real filesystem and bundler
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let cfg = load_and_validate(&config_path)?;

    let overrides = Overrides {
        watch: args.watch,
        exclude: args.exclude.clone(),
        packs: args.pack.clone(),
    };
    let specs = resolve_pack_specs(&cfg, &config_root_dir(&config_path)?, &overrides)?;

    if args.dry_run {
        print_dry_run(&specs)?;
        return Ok(());
    }

    let watching = specs.iter().any(|s| s.watch);
    let (trigger, signal) = shutdown_channel();

    // Ctrl-C → graceful shutdown.
    {
        let trigger = trigger.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "failed to listen for Ctrl+C");
                return;
            }
            info!("shutdown requested");
            trigger.trigger();
        });
    }

    info!(packs = specs.len(), watching, "packsync started");

    let orchestrator = BuildOrchestrator::new(specs, Arc::new(RealFileSystem), Arc::new(CommandBundler::new()));
    let report = orchestrator.run(signal).await;

    let failed: Vec<&str> = report.failed().into_iter().map(|o| o.pack.as_str()).collect();
    if !failed.is_empty() {
        bail!("{} pack(s) failed: {}", failed.len(), failed.join(", "));
    }

    if !watching {
        println!("Build finished!");
    }
    Ok(())
}

/// Simple dry-run output: print packs with their effective patterns.
fn print_dry_run(specs: &[PackSpec]) -> Result<()> {
    println!("packsync dry-run");
    println!();

    println!("packs ({}):", specs.len());
    for spec in specs {
        let patterns = spec.pattern_set()?;
        println!("  - {} ({:?})", spec.name, spec.kind);
        println!("      src_dir: {}", spec.src_dir.display());
        println!("      out_dir: {}", spec.out_dir.display());
        println!("      include: {:?}", patterns.include());
        println!("      exclude: {:?}", patterns.exclude());
        println!("      remove_orphans: {}", spec.remove_orphans);
        println!("      watch: {}", spec.watch);
        println!("      copy: {:?}", spec.copy_policy);
        for artifact in &spec.artifacts {
            println!(
                "      artifact: {} -> {} ({:?})",
                artifact.trigger, artifact.destination, artifact.generator
            );
        }
        if let Some(script) = &spec.script {
            println!("      script: {} (bundle: {}, command: {})", script.entry, script.bundle, script.command);
        }
    }

    debug!("dry-run complete (no files touched)");
    Ok(())
}
