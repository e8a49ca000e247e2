// src/resolve/probe.rs

//! Compatibility probes.
//!
//! The resolver only asks "is this executable acceptable?". The production
//! answer comes from running an external check script with the candidate
//! and reading its exit code; tests can plug in their own
//! [`CompatibilityProbe`].

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::env::ProcessEnvironment;
use crate::exec::{ProcessRunner, SpawnRequest};
use crate::fs::FileSystem;
use crate::layout::Layout;

/// File name of the check script inside the cache directory.
pub const PROBE_SCRIPT_NAME: &str = "check_interpreter.py";

/// Exits 0 when the running interpreter is usable.
pub const PROBE_SCRIPT: &str = r#"import sys

if sys.version_info < (3, 8):
    sys.exit(1)

try:
    import venv  # noqa: F401
except ImportError:
    sys.exit(2)

sys.exit(0)
"#;

/// Decides whether a candidate executable is acceptable.
pub trait CompatibilityProbe: Send + Sync {
    /// One-time setup before a search. Must not fail the search.
    fn prepare(&self) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        Box::pin(async {})
    }

    fn is_compatible<'a>(
        &'a self,
        candidate: &'a Path,
    ) -> Pin<Box<dyn Future<Output = bool> + Send + 'a>>;
}

/// Runs `<candidate> <cache_dir>/check_interpreter.py`; compatible iff it
/// exits with code 0.
#[derive(Debug, Clone)]
pub struct ScriptProbe {
    runner: ProcessRunner,
    fs: Arc<dyn FileSystem>,
    script_path: PathBuf,
    environment: Option<ProcessEnvironment>,
}

impl ScriptProbe {
    pub fn new(runner: ProcessRunner, fs: Arc<dyn FileSystem>, layout: &dyn Layout) -> Self {
        Self {
            runner,
            fs,
            script_path: layout.cache_dir().join(PROBE_SCRIPT_NAME),
            environment: None,
        }
    }

    /// Environment the candidates are run with (usually the composed one).
    pub fn with_environment(mut self, env: ProcessEnvironment) -> Self {
        self.environment = Some(env);
        self
    }

    pub fn script_path(&self) -> &Path {
        &self.script_path
    }
}

impl CompatibilityProbe for ScriptProbe {
    /// Write the check script. A failure is logged and the search goes on,
    /// relying on a copy left by an earlier run.
    fn prepare(&self) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        let fs = Arc::clone(&self.fs);
        let path = self.script_path.clone();

        Box::pin(async move {
            let target = path.clone();
            match tokio::task::spawn_blocking(move || fs.write(&target, PROBE_SCRIPT.as_bytes()))
                .await
            {
                Ok(Ok(())) => debug!(path = %path.display(), "wrote interpreter check script"),
                Ok(Err(err)) => warn!(
                    path = %path.display(),
                    error = %err,
                    "could not write interpreter check script; using existing copy"
                ),
                Err(err) => warn!(error = %err, "interpreter check script writer did not finish"),
            }
        })
    }

    fn is_compatible<'a>(
        &'a self,
        candidate: &'a Path,
    ) -> Pin<Box<dyn Future<Output = bool> + Send + 'a>> {
        Box::pin(async move {
            let mut request = SpawnRequest::new(candidate.to_string_lossy())
                .arg(self.script_path.to_string_lossy());
            if let Some(env) = &self.environment {
                request = request.environment(env.clone());
            }

            let result = self.runner.run(request).await;
            debug!(
                candidate = %candidate.display(),
                exit_code = result.exit_code,
                stderr = %result.stderr.trim(),
                "interpreter check finished"
            );
            result.success()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;
    use crate::layout::DirLayout;
    use crate::types::Platform;

    fn probe(fs: &MockFileSystem) -> ScriptProbe {
        let layout = Arc::new(DirLayout::under("/ik", Platform::Linux));
        let runner = ProcessRunner::new(Arc::new(fs.clone()), layout.clone(), Platform::Linux);
        ScriptProbe::new(runner, Arc::new(fs.clone()), layout.as_ref())
    }

    #[tokio::test]
    async fn prepare_writes_script_into_cache_dir() {
        let fs = MockFileSystem::new();
        let probe = probe(&fs);

        probe.prepare().await;

        assert_eq!(probe.script_path(), Path::new("/ik/cache/check_interpreter.py"));
        assert_eq!(fs.contents(probe.script_path()).unwrap(), PROBE_SCRIPT.as_bytes());
    }

    #[tokio::test]
    async fn prepare_tolerates_write_failure() {
        let fs = MockFileSystem::new();
        fs.fail_writes(true);
        let probe = probe(&fs);

        probe.prepare().await;

        assert!(!fs.exists(probe.script_path()));
    }

    #[tokio::test]
    async fn unrunnable_candidate_is_incompatible() {
        let fs = MockFileSystem::new();
        let probe = probe(&fs);
        assert!(!probe.is_compatible(Path::new("/nonexistent/python3")).await);
    }
}
