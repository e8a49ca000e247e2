use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use interpkit::resolve::CompatibilityProbe;

/// A fake probe that:
/// - records every candidate it was asked about, in order
/// - accepts exactly the candidates it was built with.
#[derive(Debug, Clone, Default)]
pub struct RecordingProbe {
    accept: Vec<PathBuf>,
    seen: Arc<Mutex<Vec<PathBuf>>>,
    prepared: Arc<Mutex<usize>>,
}

impl RecordingProbe {
    pub fn accepting<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            accept: paths.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn seen(&self) -> Vec<PathBuf> {
        self.seen.lock().unwrap().clone()
    }

    pub fn prepare_calls(&self) -> usize {
        *self.prepared.lock().unwrap()
    }
}

impl CompatibilityProbe for RecordingProbe {
    fn prepare(&self) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        Box::pin(async move {
            *self.prepared.lock().unwrap() += 1;
        })
    }

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
