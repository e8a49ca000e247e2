// src/host.rs

//! Wiring of composer, runner and resolver from a [`ConfigFile`].

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::ConfigFile;
use crate::env::{EnvironmentComposer, ProcessEnvironment, PATH_VAR};
use crate::exec::{ProcessRunner, SpawnRequest, SpawnResult};
use crate::fs::{FileSystem, RealFileSystem};
use crate::layout::{DirLayout, Layout};
use crate::resolve::{InterpreterResolver, ScriptProbe};

/// Everything a host application needs, built once per configuration.
///
/// The environment is composed from `base` when the host is created and
/// never mutated afterwards; a config change means building a new `Host`.
#[derive(Debug, Clone)]
pub struct Host {
    config: ConfigFile,
    fs: Arc<dyn FileSystem>,
    layout: Arc<dyn Layout>,
    environment: ProcessEnvironment,
    runner: ProcessRunner,
}

impl Host {
    /// Host over the real filesystem and the current process environment.
    pub fn new(config: ConfigFile) -> Self {
        Self::with_parts(config, Arc::new(RealFileSystem), ProcessEnvironment::capture())
    }

    pub fn with_parts(config: ConfigFile, fs: Arc<dyn FileSystem>, base: ProcessEnvironment) -> Self {
        let layout: Arc<dyn Layout> = Arc::new(DirLayout::clone(&config.layout));
        let composer = EnvironmentComposer::new(Arc::clone(&layout), config.platform);
        let environment = composer.compose(&base, &config.environment);
        let runner = ProcessRunner::new(Arc::clone(&fs), Arc::clone(&layout), config.platform)
            .with_default_timeout(config.runner_timeout);

        Self {
            config,
            fs,
            layout,
            environment,
            runner,
        }
    }

    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// The composed environment children run with.
    pub fn environment(&self) -> &ProcessEnvironment {
        &self.environment
    }

    pub fn runner(&self) -> &ProcessRunner {
        &self.runner
    }

    /// Run `request` with the composed environment unless it brings its own.
    pub async fn run_process(&self, mut request: SpawnRequest) -> SpawnResult {
        if request.environment.is_none() {
            request.environment = Some(self.environment.clone());
        }
        self.runner.run(request).await
    }

    pub fn resolver(&self) -> InterpreterResolver {
        let probe = ScriptProbe::new(self.runner.clone(), Arc::clone(&self.fs), self.layout.as_ref())
            .with_environment(self.environment.clone());

        InterpreterResolver::new(
            Arc::clone(&self.fs),
            Arc::clone(&self.layout),
            self.config.platform,
            Arc::new(probe),
        )
        .with_search_path(self.environment.get_or_empty(PATH_VAR))
        .with_isolated_runtime_dir(self.config.isolated_runtime_dir.clone())
    }

    /// `extra_dirs` are searched first, then the configured custom directories.
    pub async fn resolve_interpreter(
        &self,
        use_builtin_toolchain: bool,
        extra_dirs: &[String],
    ) -> Option<PathBuf> {
        let mut dirs = extra_dirs.to_vec();
        dirs.extend(self.config.custom_directories.iter().cloned());
        self.resolver().resolve(use_builtin_toolchain, &dirs).await
    }
}
