use std::sync::{Arc, Mutex};

use packsync::engine::ShutdownSignal;
use packsync::errors::SyncError;
use packsync::exec::{BundleFuture, BundleRequest, ScriptBundler};

/// A fake bundler that:
/// - records every request it receives
/// - completes immediately, or waits for shutdown in watch mode
/// - fails with `BundleError` when built with [`FakeBundler::failing`].
#[derive(Debug, Clone, Default)]
pub struct FakeBundler {
    requests: Arc<Mutex<Vec<BundleRequest>>>,
    fail: bool,
}

impl FakeBundler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn requests(&self) -> Vec<BundleRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl ScriptBundler for FakeBundler {
    fn bundle(&self, request: BundleRequest, mut shutdown: ShutdownSignal) -> BundleFuture<'_> {
        let requests = Arc::clone(&self.requests);
        let fail = self.fail;

        Box::pin(async move {
            let watch = request.watch;
            let pack = request.pack.clone();
            requests.lock().unwrap().push(request);

            if fail {
                return Err(SyncError::BundleError(format!("fake failure for pack '{pack}'")));
            }
            if watch {
                shutdown.wait().await;
            }
            Ok(())
        })
    }
}
