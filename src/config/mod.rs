// src/config/mod.rs

//! Configuration loading and validation for packsync.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate pack definitions (`validate.rs`).
//! - Resolve packs and CLI overrides into `PackSpec`s (`resolve.rs`).

pub mod loader;
pub mod model;
pub mod resolve;
pub mod validate;

pub use loader::{config_root_dir, load_and_validate, load_from_path};
pub use model::{ArtifactConfig, BuildSection, ConfigFile, PackConfig, RawConfigFile, ScriptConfig};
pub use resolve::{resolve_pack_specs, Overrides};
