// src/exec/mod.rs

//! Process execution layer.
//!
//! Runs one external command at a time per call, using
//! `tokio::process::Command`, and hands back exactly one [`SpawnResult`].
//!
//! - [`request`] defines the request / result types.
//! - [`completion`] is the single-shot result channel.
//! - [`scratch`] handles the private temp directory given to installer and
//!   virtualenv runs on Windows.
//! - [`runner`] owns the spawn / capture / wait logic.

pub mod completion;
pub mod request;
pub mod runner;
pub mod scratch;

pub use completion::{Completion, CompletionHandle};
pub use request::{SpawnRequest, SpawnResult, SPAWN_FAILED_EXIT_CODE};
pub use runner::ProcessRunner;
