use std::path::{Path, PathBuf};
use std::thread;

use crossbeam_channel::{Receiver, TryRecvError, bounded};
use tracing::{debug, warn};

use crate::error::ChartResult;

/// Opens a persisted interactive bundle outside the host process.
///
/// Runs on a background worker, so implementations may block.
pub trait ViewerLauncher: Send + 'static {
    fn launch(&self, path: &Path) -> ChartResult<()>;
}

impl<F> ViewerLauncher for F
where
    F: Fn(&Path) -> ChartResult<()> + Send + 'static,
{
    fn launch(&self, path: &Path) -> ChartResult<()> {
        self(path)
    }
}

/// Opens bundles with the platform's default viewer.
#[cfg(feature = "external-viewer")]
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemViewerLauncher;

#[cfg(feature = "external-viewer")]
impl ViewerLauncher for SystemViewerLauncher {
    fn launch(&self, path: &Path) -> ChartResult<()> {
        open::that(path)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewerOutcome {
    Opened,
    Failed(String),
}

/// Completion signalled by the viewer worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerCompletion {
    /// View transition generation the launch was requested in.
    pub generation: u64,
    pub path: PathBuf,
    pub outcome: ViewerOutcome,
}

pub(crate) enum JobStatus {
    Running,
    Done(ViewerCompletion),
    Lost,
}

/// One in-flight viewer launch. The worker sends exactly one completion.
#[derive(Debug)]
pub(crate) struct ViewerJob {
    generation: u64,
    receiver: Receiver<ViewerCompletion>,
}

impl ViewerJob {
    pub(crate) fn spawn<L: ViewerLauncher>(launcher: L, path: PathBuf, generation: u64) -> Self {
        let (sender, receiver) = bounded(1);
        thread::spawn(move || {
            let outcome = match launcher.launch(&path) {
                Ok(()) => ViewerOutcome::Opened,
                Err(err) => ViewerOutcome::Failed(err.to_string()),
            };
            // The view may have been dropped or moved on; nobody to tell then.
            let _ = sender.send(ViewerCompletion {
                generation,
                path,
                outcome,
            });
        });
        debug!(generation, "external viewer launch started");
        Self {
            generation,
            receiver,
        }
    }

    /// Non-blocking check for the worker's completion.
    pub(crate) fn status(&self) -> JobStatus {
        match self.receiver.try_recv() {
            Ok(completion) => JobStatus::Done(completion),
            Err(TryRecvError::Empty) => JobStatus::Running,
            Err(TryRecvError::Disconnected) => {
                warn!(
                    generation = self.generation,
                    "external viewer worker exited without completing"
                );
                JobStatus::Lost
            }
        }
    }
}
