// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `packsync`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "packsync",
    version,
    about = "Mirror pack source trees into output directories and keep them in sync.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Relative pack directories are resolved against its directory.
    #[arg(long, value_name = "PATH", default_value = "Packsync.toml")]
    pub config: String,

    /// Keep watching every pack after the initial sync, regardless of config.
    #[arg(long)]
    pub watch: bool,

    /// Additional exclude glob, applied to every pack. Repeatable.
    #[arg(long, value_name = "GLOB")]
    pub exclude: Vec<String>,

    /// Only run the named pack. Repeatable.
    #[arg(long, value_name = "NAME")]
    pub pack: Vec<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `PACKSYNC_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print resolved packs, but don't touch any files.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
