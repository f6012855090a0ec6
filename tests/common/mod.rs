#![allow(dead_code, unused_imports)]

pub use packsync_test_utils::builders;
pub use packsync_test_utils::{init_tracing, with_timeout, FakeBundler};

use std::path::Path;
use std::sync::Arc;

use packsync::fs::mock::MockFileSystem;
use packsync::fs::FileSystem;

/// Mock filesystem pre-populated with `files` under `/src`.
pub fn mock_with_source(files: &[(&str, &str)]) -> MockFileSystem {
    let fs = MockFileSystem::new();
    fs.add_dir("/src");
    for (rel, content) in files {
        fs.add_file(Path::new("/src").join(rel), content.as_bytes());
    }
    fs
}

pub fn shared(fs: &MockFileSystem) -> Arc<dyn FileSystem> {
    Arc::new(fs.clone())
}
