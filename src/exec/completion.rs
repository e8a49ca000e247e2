// src/exec/completion.rs

//! Single-shot delivery of a [`SpawnResult`].
//!
//! [`Completion::complete`] consumes the producer, so a second completion
//! cannot be expressed. If the producer is dropped without completing (the
//! worker task panicked or was aborted), the [`CompletionHandle`] still
//! resolves exactly once, with a sentinel failure.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::oneshot;
use tracing::debug;

use super::request::SpawnResult;

const ABANDONED_MESSAGE: &str = "process runner stopped before reporting a result";

/// Create a connected producer / consumer pair.
pub fn channel() -> (Completion, CompletionHandle) {
    let (tx, rx) = oneshot::channel();
    (Completion { tx }, CompletionHandle { rx })
}

/// Producer side; owned by the task running the process.
#[derive(Debug)]
pub struct Completion {
    tx: oneshot::Sender<SpawnResult>,
}

impl Completion {
    pub fn complete(self, result: SpawnResult) {
        if self.tx.send(result).is_err() {
            debug!("completion handle dropped before the result arrived");
        }
    }
}

/// Consumer side; resolves to the run's only result.
#[derive(Debug)]
pub struct CompletionHandle {
    rx: oneshot::Receiver<SpawnResult>,
}

impl Future for CompletionHandle {
    type Output = SpawnResult;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.get_mut().rx)
            .poll(cx)
            .map(|res| res.unwrap_or_else(|_| SpawnResult::failed_to_start(ABANDONED_MESSAGE)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn delivers_the_completed_result() {
        let (completion, handle) = channel();
        completion.complete(SpawnResult::new(3, "out", "err"));
        assert_eq!(handle.await, SpawnResult::new(3, "out", "err"));
    }

    #[tokio::test]
    async fn dropped_producer_yields_sentinel() {
        let (completion, handle) = channel();
        drop(completion);
        let result = handle.await;
        assert_eq!(result.exit_code, crate::exec::SPAWN_FAILED_EXIT_CODE);
        assert!(!result.stderr.is_empty());
    }
}
