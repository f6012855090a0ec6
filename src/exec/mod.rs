// src/exec/mod.rs

//! Script bundling layer.
//!
//! The sync engine never writes a behavior pack's `scripts/` subtree itself;
//! it hands that job to a [`ScriptBundler`].
//!
//! - [`bundler`] defines the `ScriptBundler` trait and the request type.
//! - [`command`] provides `CommandBundler`, which drives an
//!   `esbuild`-compatible executable through `tokio::process`. Tests swap in
//!   a fake implementation instead.

pub mod bundler;
pub mod command;

pub use bundler::{BundleFuture, BundleRequest, ScriptBundler};
pub use command::{build_args, CommandBundler};
