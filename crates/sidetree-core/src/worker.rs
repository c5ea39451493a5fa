use std::future::Future;
use std::sync::Mutex;

use sidetree_types::{ComponentState, Lifecycle};
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::error::{CoreError, CoreResult};

/// Receives the stop message in a worker loop.
pub(crate) type StopSignal = oneshot::Receiver<()>;

struct RunningTask {
    stop_tx: oneshot::Sender<()>,
    join: JoinHandle<()>,
}

/// One spawned task per worker, joined on stop.
///
/// `stop` returns only after the task has exited, so callers can rely on the
/// worker having released everything it holds.
pub(crate) struct WorkerTask {
    lifecycle: Lifecycle,
    task: Mutex<Option<RunningTask>>,
}

impl WorkerTask {
    pub(crate) fn new(component: &'static str) -> Self {
        Self {
            lifecycle: Lifecycle::new(component),
            task: Mutex::new(None),
        }
    }

    pub(crate) fn state(&self) -> ComponentState {
        self.lifecycle.state()
    }

    pub(crate) fn is_running(&self) -> bool {
        self.lifecycle.is_running()
    }

    /// Spawn the worker loop on the current tokio runtime.
    pub(crate) fn spawn<F, Fut>(&self, run: F) -> CoreResult<()>
    where
        F: FnOnce(StopSignal) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.lifecycle.claim_start()?;
        let runtime = match Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                self.lifecycle.fail();
                return Err(CoreError::Worker(format!(
                    "{} needs a tokio runtime: {e}",
                    self.lifecycle.component()
                )));
            }
        };
        let (stop_tx, stop_rx) = oneshot::channel();
        let join = runtime.spawn(run(stop_rx));
        *self.task.lock().expect("worker lock poisoned") = Some(RunningTask { stop_tx, join });
        info!(component = self.lifecycle.component(), "worker started");
        Ok(())
    }

    /// Ask the loop to exit and wait for it.
    pub(crate) async fn stop(&self) -> CoreResult<()> {
        self.lifecycle.claim_stop()?;
        let task = self.task.lock().expect("worker lock poisoned").take();
        let Some(task) = task else {
            return Ok(());
        };
        if task.stop_tx.send(()).is_err() {
            debug!(component = self.lifecycle.component(), "worker loop already exited");
        }
        task.join.await.map_err(|e| {
            CoreError::Worker(format!("{} task failed: {e}", self.lifecycle.component()))
        })?;
        info!(component = self.lifecycle.component(), "worker stopped");
        Ok(())
    }
}
