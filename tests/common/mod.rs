#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use interpkit::fs::{FileSystem, RealFileSystem};
use interpkit::layout::{DirLayout, Layout};
use interpkit::types::Platform;

pub use interpkit_test_utils::{init_tracing, with_timeout};

/// Layout rooted in a test-owned directory.
pub fn layout_under(base: &Path, platform: Platform) -> Arc<dyn Layout> {
    Arc::new(DirLayout::under(base, platform))
}

pub fn real_fs() -> Arc<dyn FileSystem> {
    Arc::new(RealFileSystem)
}
