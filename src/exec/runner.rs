// src/exec/runner.rs

//! Spawns one external command and reports a single [`SpawnResult`].

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::completion::{self, CompletionHandle};
use super::request::{SpawnRequest, SpawnResult, SPAWN_FAILED_EXIT_CODE};
use super::scratch::{self, ScratchDir};
use crate::env::ProcessEnvironment;
use crate::fs::FileSystem;
use crate::layout::Layout;
use crate::types::Platform;

/// How long to keep reading pipes after the child is gone. Grandchildren that
/// inherited the pipes could otherwise keep us waiting forever.
const STREAM_DRAIN_GRACE: Duration = Duration::from_secs(1);

const READ_CHUNK: usize = 8 * 1024;

/// Runs commands for the host and for the interpreter resolver.
///
/// Cheap to clone; clones share the filesystem and layout.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    fs: Arc<dyn FileSystem>,
    layout: Arc<dyn Layout>,
    platform: Platform,
    default_timeout: Option<Duration>,
}

impl ProcessRunner {
    pub fn new(fs: Arc<dyn FileSystem>, layout: Arc<dyn Layout>, platform: Platform) -> Self {
        Self {
            fs,
            layout,
            platform,
            default_timeout: None,
        }
    }

    /// Timeout applied to requests that do not set their own.
    pub fn with_default_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.default_timeout = timeout;
        self
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Start `request` in the background and return a handle resolving to
    /// its result. Must be called from within a Tokio runtime.
    pub fn run(&self, request: SpawnRequest) -> CompletionHandle {
        let (completion, handle) = completion::channel();
        let runner = self.clone();
        tokio::spawn(async move {
            let result = runner.execute(request).await;
            completion.complete(result);
        });
        handle
    }

    /// Fire-and-observe variant of [`run`](Self::run): `on_complete` is
    /// called exactly once with the result.
    pub fn run_with_callback<F>(&self, request: SpawnRequest, on_complete: F)
    where
        F: FnOnce(SpawnResult) + Send + 'static,
    {
        let handle = self.run(request);
        tokio::spawn(async move {
            on_complete(handle.await);
        });
    }

    /// Run `request` to completion on the current task.
    ///
    /// Never fails: start-up problems come back as a result carrying
    /// [`SPAWN_FAILED_EXIT_CODE`] and the error text in `stderr`.
    pub async fn execute(&self, request: SpawnRequest) -> SpawnResult {
        let scratch = if self.platform.needs_scratch_tmp_dir()
            && scratch::needs_scratch_dir(&request.command, &request.args)
        {
            match scratch::prepare(
                self.fs.as_ref(),
                self.layout.as_ref(),
                request.environment.as_ref(),
            ) {
                Ok(scratch) => Some(scratch),
                Err(err) => {
                    warn!(command = %request.command, error = %err, "scratch temp dir setup failed");
                    return SpawnResult::failed_to_start(format!("{err:#}"));
                }
            }
        } else {
            None
        };

        let (cwd, env) = match &scratch {
            Some(ScratchDir { dir, env }) => (Some(dir.clone()), Some(env)),
            None => (self.resolve_cwd(&request), request.environment.as_ref()),
        };
        let timeout = request.timeout.or(self.default_timeout);

        let result = spawn_and_collect(&request, cwd.as_deref(), env, timeout).await;

        if let Some(scratch) = scratch {
            scratch::cleanup(self.fs.as_ref(), scratch);
        }

        if result.success() {
            info!(command = %request.command, exit_code = result.exit_code, "process exited");
        } else {
            warn!(command = %request.command, exit_code = result.exit_code, "process failed");
        }
        result
    }

    /// Explicit directory, else the built-in bin dir when present, else inherit.
    fn resolve_cwd(&self, request: &SpawnRequest) -> Option<PathBuf> {
        if let Some(dir) = &request.working_directory {
            return Some(dir.clone());
        }
        let bin = self.layout.env_bin_dir();
        self.fs.is_dir(bin).then(|| bin.to_path_buf())
    }
}

enum WaitOutcome {
    Exited(ExitStatus),
    TimedOut(Duration),
    WaitFailed(std::io::Error),
}

async fn spawn_and_collect(
    request: &SpawnRequest,
    cwd: Option<&Path>,
    env: Option<&ProcessEnvironment>,
    timeout: Option<Duration>,
) -> SpawnResult {
    info!(
        command = %request.command,
        args = ?request.args,
        cwd = ?cwd,
        "starting process"
    );

    let mut cmd = Command::new(&request.command);
    cmd.args(&request.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }
    if let Some(env) = env {
        env.apply_to(&mut cmd);
    }

    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(err) => {
            return SpawnResult::failed_to_start(format!(
                "failed to start '{}': {err}",
                request.command
            ));
        }
    };

    let stdout = child.stdout.take().map(StreamCapture::start);
    let stderr = child.stderr.take().map(StreamCapture::start);

    let outcome = match timeout {
        Some(limit) => match tokio::time::timeout(limit, child.wait()).await {
            Ok(Ok(status)) => WaitOutcome::Exited(status),
            Ok(Err(err)) => WaitOutcome::WaitFailed(err),
            Err(_) => {
                if let Err(err) = child.kill().await {
                    warn!(command = %request.command, error = %err, "failed to kill timed-out process");
                }
                WaitOutcome::TimedOut(limit)
            }
        },
        None => match child.wait().await {
            Ok(status) => WaitOutcome::Exited(status),
            Err(err) => WaitOutcome::WaitFailed(err),
        },
    };

    let stdout = StreamCapture::finish(stdout).await;
    let mut stderr = StreamCapture::finish(stderr).await;

    let exit_code = match outcome {
        WaitOutcome::Exited(status) => status.code().unwrap_or(SPAWN_FAILED_EXIT_CODE),
        WaitOutcome::TimedOut(limit) => {
            push_line(&mut stderr, &format!("process timed out after {}s", limit.as_secs_f64()));
            SPAWN_FAILED_EXIT_CODE
        }
        WaitOutcome::WaitFailed(err) => {
            push_line(&mut stderr, &format!("waiting for '{}' failed: {err}", request.command));
            SPAWN_FAILED_EXIT_CODE
        }
    };

    SpawnResult::new(exit_code, stdout, stderr)
}

fn append_chunk(sink: &Mutex<Vec<u8>>, chunk: &[u8]) {
    sink.lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .extend_from_slice(chunk);
}

fn push_line(buf: &mut String, line: &str) {
    if !buf.is_empty() && !buf.ends_with('\n') {
        buf.push('\n');
    }
    buf.push_str(line);
}

/// Accumulates one output stream in arrival order.
struct StreamCapture {
    buf: Arc<Mutex<Vec<u8>>>,
    task: JoinHandle<()>,
}

impl StreamCapture {
    fn start<R>(mut reader: R) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let buf = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&buf);
        let task = tokio::spawn(async move {
            let mut chunk = vec![0u8; READ_CHUNK];
            loop {
                match reader.read(&mut chunk).await {
                    Ok(0) => break,
                    Ok(n) => append_chunk(&sink, &chunk[..n]),
                    Err(err) => {
                        debug!(error = %err, "stopped reading child output");
                        break;
                    }
                }
            }
        });
        Self { buf, task }
    }

    /// Wait briefly for EOF, then decode whatever arrived.
    async fn finish(capture: Option<Self>) -> String {
        let Some(mut capture) = capture else {
            return String::new();
        };
        if tokio::time::timeout(STREAM_DRAIN_GRACE, &mut capture.task)
            .await
            .is_err()
        {
            debug!("child output still open after exit; truncating capture");
            capture.task.abort();
        }
        let bytes = capture
            .buf
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        String::from_utf8_lossy(&bytes).into_owned()
    }
}
