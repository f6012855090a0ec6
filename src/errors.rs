// src/errors.rs

//! Crate-wide error type and result alias.
//!
//! Per-entry failures (`CopyError`, `DeleteError`) are usually collected into
//! a [`SyncResult`](crate::sync::SyncResult) rather than propagated; the other
//! variants abort the operation that raised them.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to copy {path:?}: {source}")]
    CopyError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to delete {path:?}: {source}")]
    DeleteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Watch error: {0}")]
    WatchError(String),

    #[error("Script bundling failed: {0}")]
    BundleError(String),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SyncError {
    /// Wrap an IO error with the path that was being read, so that a failed
    /// pipeline can be reported with the offending location.
    pub fn io_at(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        let path = path.into();
        SyncError::IoError(std::io::Error::new(
            err.kind(),
            format!("{}: {err}", path.display()),
        ))
    }
}

impl From<notify::Error> for SyncError {
    fn from(err: notify::Error) -> Self {
        SyncError::WatchError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
