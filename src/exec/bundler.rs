// src/exec/bundler.rs

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;

use crate::engine::ShutdownSignal;
use crate::errors::Result;
use crate::pack::{PackSpec, ScriptSpec};

/// Boxed future returned by [`ScriptBundler::bundle`].
pub type BundleFuture<'a> = Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;

/// Everything a bundler needs to build one pack's scripts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleRequest {
    pub pack: String,
    /// Pack source root; the bundler's working directory.
    pub src_dir: PathBuf,
    /// Destination `scripts` directory, owned by the bundler.
    pub out_dir: PathBuf,
    pub script: ScriptSpec,
    /// Keep rebuilding until shutdown instead of building once.
    pub watch: bool,
}

impl BundleRequest {
    /// Request for `spec`, or `None` if the pack declares no scripts.
    pub fn for_pack(spec: &PackSpec) -> Option<Self> {
        let script = spec.script.clone()?;
        Some(Self {
            pack: spec.name.clone(),
            src_dir: spec.src_dir.clone(),
            out_dir: spec.scripts_out_dir(),
            script,
            watch: spec.watch,
        })
    }
}

/// Trait abstracting how a pack's scripts are built.
///
/// Production code uses [`CommandBundler`](super::CommandBundler); tests
/// provide implementations that record requests without spawning processes.
///
/// In watch mode the returned future is expected to stay pending until
/// `shutdown` fires, then resolve once the bundler has stopped.
pub trait ScriptBundler: Send + Sync {
    fn bundle(&self, request: BundleRequest, shutdown: ShutdownSignal) -> BundleFuture<'_>;
}
