// src/exec/command.rs

//! `esbuild`-compatible bundler process runner.

use std::path::Path;
use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::engine::ShutdownSignal;
use crate::errors::{Result, SyncError};
use crate::pack::SCRIPTS_DIR;

use super::bundler::{BundleFuture, BundleRequest, ScriptBundler};

/// Runs the configured bundler executable once per request.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandBundler;

impl CommandBundler {
    pub fn new() -> Self {
        Self
    }
}

impl ScriptBundler for CommandBundler {
    fn bundle(&self, request: BundleRequest, shutdown: ShutdownSignal) -> BundleFuture<'_> {
        Box::pin(run_bundler(request, shutdown))
    }
}

/// Command-line arguments for `request`, in `esbuild` syntax.
pub fn build_args(request: &BundleRequest) -> Vec<String> {
    let script = &request.script;
    let out_dir = request.out_dir.to_string_lossy();
    let mut args = Vec::new();

    if script.bundle {
        args.push(script.entry.clone());
        args.push("--bundle".to_string());
        args.push(format!("--outfile={}/{}.js", out_dir, file_stem(&script.entry)));
        for external in &script.external {
            args.push(format!("--external:{external}"));
        }
        if script.minify {
            args.push("--minify".to_string());
        }
    } else {
        args.push(format!("{SCRIPTS_DIR}/**/*"));
        args.push(format!("--outdir={out_dir}"));
    }

    args.push("--format=esm".to_string());
    args.push("--platform=neutral".to_string());

    if let Some(tsconfig) = &script.tsconfig {
        args.push(format!("--tsconfig={}", tsconfig.to_string_lossy()));
    }
    if script.source_map {
        args.push("--sourcemap".to_string());
    }
    if let Some(banner) = &script.banner {
        args.push(format!("--banner:js={banner}"));
    }
    if let Some(footer) = &script.footer {
        args.push(format!("--footer:js={footer}"));
    }
    if request.watch {
        args.push("--watch=forever".to_string());
    }

    args
}

fn file_stem(entry: &str) -> &str {
    Path::new(entry)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(entry)
}

async fn run_bundler(request: BundleRequest, mut shutdown: ShutdownSignal) -> Result<()> {
    empty_dir(&request.out_dir).await?;

    let args = build_args(&request);
    info!(
        pack = %request.pack,
        cmd = %request.script.command,
        watch = request.watch,
        "starting script bundler"
    );
    debug!(pack = %request.pack, ?args, "bundler arguments");

    let mut child = Command::new(&request.script.command)
        .args(&args)
        .current_dir(&request.src_dir)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| {
            SyncError::BundleError(format!(
                "spawning '{}' for pack '{}': {e}",
                request.script.command, request.pack
            ))
        })?;

    // Always consume output so pipe buffers don't fill; log at debug.
    if let Some(stdout) = child.stdout.take() {
        let pack = request.pack.clone();
        tokio::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                debug!(pack = %pack, "bundler stdout: {}", line);
            }
        });
    }
    if let Some(stderr) = child.stderr.take() {
        let pack = request.pack.clone();
        tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                debug!(pack = %pack, "bundler stderr: {}", line);
            }
        });
    }

    tokio::select! {
        status = child.wait() => {
            let status = status.map_err(|e| {
                SyncError::BundleError(format!("waiting for bundler of pack '{}': {e}", request.pack))
            })?;

            if !status.success() {
                return Err(SyncError::BundleError(format!(
                    "bundler for pack '{}' exited with code {}",
                    request.pack,
                    status.code().unwrap_or(-1)
                )));
            }
            info!(pack = %request.pack, "bundled scripts");
        }

        _ = shutdown.wait() => {
            info!(pack = %request.pack, "closing script bundler");
            if let Err(e) = child.kill().await {
                warn!(pack = %request.pack, error = %e, "failed to kill bundler process");
            }
        }
    }

    Ok(())
}

/// Ensure `dir` exists and holds nothing.
async fn empty_dir(dir: &Path) -> Result<()> {
    match tokio::fs::remove_dir_all(dir).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(SyncError::io_at(dir, e)),
    }
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| SyncError::io_at(dir, e))
}
