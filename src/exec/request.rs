// src/exec/request.rs

//! Input and output types of a single process run.

use std::path::PathBuf;
use std::time::Duration;

use crate::env::ProcessEnvironment;

/// Exit code reported when the process never ran to completion on its own:
/// it failed to start, was killed by a signal, or timed out.
pub const SPAWN_FAILED_EXIT_CODE: i32 = -1;

/// One command to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnRequest {
    pub command: String,
    pub args: Vec<String>,
    /// Explicit working directory; when `None` the runner picks one.
    pub working_directory: Option<PathBuf>,
    /// Complete environment for the child; when `None` it inherits ours.
    pub environment: Option<ProcessEnvironment>,
    /// Kill the child once this elapses. Falls back to the runner default.
    pub timeout: Option<Duration>,
}

impl SpawnRequest {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            args: Vec::new(),
            working_directory: None,
            environment: None,
            timeout: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn working_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_directory = Some(dir.into());
        self
    }

    pub fn environment(mut self, env: ProcessEnvironment) -> Self {
        self.environment = Some(env);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Everything a caller learns about a finished run.
///
/// Failures to start are reported here too, with
/// [`SPAWN_FAILED_EXIT_CODE`] and the error text in `stderr`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnResult {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl SpawnResult {
    pub fn new(exit_code: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            exit_code,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    pub fn failed_to_start(error: impl Into<String>) -> Self {
        Self::new(SPAWN_FAILED_EXIT_CODE, String::new(), error)
    }

    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}
