// src/resolve/resolver.rs

//! First-match-wins search for a compatible interpreter.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info, trace};

use super::candidates::{CandidateSearch, SearchInputs};
use super::probe::CompatibilityProbe;
use crate::env::PATH_VAR;
use crate::fs::FileSystem;
use crate::layout::Layout;
use crate::types::Platform;

/// Walks the candidate list and returns the first executable the probe
/// accepts.
///
/// Candidates are probed one at a time; the next probe starts only after the
/// previous one has finished, so at most one check process is alive and the
/// winner is always the highest-priority compatible candidate.
#[derive(Clone)]
pub struct InterpreterResolver {
    fs: Arc<dyn FileSystem>,
    layout: Arc<dyn Layout>,
    platform: Platform,
    probe: Arc<dyn CompatibilityProbe>,
    search_path: String,
    isolated_runtime_dir: Option<String>,
}

impl std::fmt::Debug for InterpreterResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterpreterResolver")
            .field("platform", &self.platform)
            .field("search_path", &self.search_path)
            .field("isolated_runtime_dir", &self.isolated_runtime_dir)
            .finish_non_exhaustive()
    }
}

impl InterpreterResolver {
    /// Searches this process's PATH and the platform's default isolated
    /// runtime dir unless overridden.
    pub fn new(
        fs: Arc<dyn FileSystem>,
        layout: Arc<dyn Layout>,
        platform: Platform,
        probe: Arc<dyn CompatibilityProbe>,
    ) -> Self {
        Self {
            fs,
            layout,
            platform,
            probe,
            search_path: std::env::var(PATH_VAR).unwrap_or_default(),
            isolated_runtime_dir: platform.default_isolated_runtime_dir().map(str::to_string),
        }
    }

    /// PATH value to search, normally taken from the composed environment.
    pub fn with_search_path(mut self, path: impl Into<String>) -> Self {
        self.search_path = path.into();
        self
    }

    pub fn with_isolated_runtime_dir(mut self, dir: Option<String>) -> Self {
        self.isolated_runtime_dir = dir;
        self
    }

    /// Search space for one resolution, in probing order.
    pub fn search_space(&self, use_builtin_toolchain: bool, custom_directories: &[String]) -> CandidateSearch {
        let inputs = SearchInputs {
            custom_directories,
            use_builtin_toolchain,
            isolated_runtime_dir: self.isolated_runtime_dir.as_deref(),
            search_path: &self.search_path,
        };
        CandidateSearch::build(self.platform, self.layout.as_ref(), &inputs)
    }

    /// First compatible interpreter, or `None` when nothing qualifies.
    pub async fn resolve(
        &self,
        use_builtin_toolchain: bool,
        custom_directories: &[String],
    ) -> Option<PathBuf> {
        self.probe.prepare().await;

        let search = self.search_space(use_builtin_toolchain, custom_directories);
        debug!(
            locations = search.locations().len(),
            names = ?search.names(),
            "searching for a compatible interpreter"
        );

        for candidate in search.candidates() {
            if !self.fs.is_file(&candidate) {
                trace!(candidate = %candidate.display(), "no such file");
                continue;
            }

            debug!(candidate = %candidate.display(), "probing interpreter");
            if self.probe.is_compatible(&candidate).await {
                info!(interpreter = %candidate.display(), "found compatible interpreter");
                return Some(candidate);
            }
        }

        info!("no compatible interpreter found");
        None
    }
}

#[cfg(test)]
mod tests {
    use std::future::Future;
    use std::path::Path;
    use std::pin::Pin;
    use std::sync::Mutex;

    use super::*;
    use crate::fs::mock::MockFileSystem;
    use crate::layout::DirLayout;

    #[derive(Default)]
    struct ListProbe {
        accept: Vec<PathBuf>,
        seen: Mutex<Vec<PathBuf>>,
    }

    impl CompatibilityProbe for ListProbe {
        fn is_compatible<'a>(
            &'a self,
            candidate: &'a Path,
        ) -> Pin<Box<dyn Future<Output = bool> + Send + 'a>> {
            Box::pin(async move {
                self.seen.lock().unwrap().push(candidate.to_path_buf());
                self.accept.iter().any(|p| p == candidate)
            })
        }
    }

    fn resolver(fs: &MockFileSystem, probe: Arc<ListProbe>) -> InterpreterResolver {
        InterpreterResolver::new(
            Arc::new(fs.clone()),
            Arc::new(DirLayout::under("/ik", Platform::Linux)),
            Platform::Linux,
            probe,
        )
        .with_search_path("/usr/local/bin:/usr/bin")
        .with_isolated_runtime_dir(None)
    }

    #[tokio::test]
    async fn location_priority_beats_name_priority() {
        let fs = MockFileSystem::new();
        fs.add_file("/usr/local/bin/python", b"");
        fs.add_file("/usr/bin/python3", b"");
        let probe = Arc::new(ListProbe {
            accept: vec!["/usr/local/bin/python".into(), "/usr/bin/python3".into()],
            ..Default::default()
        });

        let found = resolver(&fs, probe.clone()).resolve(false, &[]).await;

        assert_eq!(found, Some(PathBuf::from("/usr/local/bin/python")));
        assert_eq!(*probe.seen.lock().unwrap(), vec![PathBuf::from("/usr/local/bin/python")]);
    }

    #[tokio::test]
    async fn rejected_candidates_fall_through() {
        let fs = MockFileSystem::new();
        fs.add_file("/ik/env/bin/python3", b"");
        fs.add_file("/usr/bin/python3", b"");
        let probe = Arc::new(ListProbe {
            accept: vec!["/usr/bin/python3".into()],
            ..Default::default()
        });

        let found = resolver(&fs, probe.clone()).resolve(true, &[]).await;

        assert_eq!(found, Some(PathBuf::from("/usr/bin/python3")));
        assert_eq!(
            *probe.seen.lock().unwrap(),
            vec![PathBuf::from("/ik/env/bin/python3"), PathBuf::from("/usr/bin/python3")]
        );
    }

    #[tokio::test]
    async fn nothing_found_is_none() {
        let fs = MockFileSystem::new();
        fs.add_file("/usr/bin/python3", b"");
        let probe = Arc::new(ListProbe::default());

        assert_eq!(resolver(&fs, probe).resolve(false, &["/opt/x".into()]).await, None);
    }
}
