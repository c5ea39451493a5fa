use std::sync::{Arc, Mutex};
use std::time::Duration;

use sidetree_store::ContentStore;
use sidetree_types::{AnchoredTransaction, BatchFile, ComponentState, Operation};
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

use crate::blockchain::BlockchainClient;
use crate::error::{CoreError, CoreResult};
use crate::opqueue::OperationQueue;
use crate::protocol::ProtocolClient;
use crate::worker::{StopSignal, WorkerTask};

/// The capabilities a batch writer needs, and nothing more.
pub trait BatchContext: Send + Sync {
    fn protocol(&self) -> Arc<dyn ProtocolClient>;
    fn blockchain(&self) -> Arc<dyn BlockchainClient>;
    fn cas(&self) -> Arc<dyn ContentStore>;
    fn operation_queue(&self) -> Arc<dyn OperationQueue>;
}

/// Accepts operations for eventual batching and anchoring.
pub trait OperationSubmitter: Send + Sync {
    fn submit(&self, operation: Operation) -> CoreResult<()>;
}

#[derive(Clone, Debug)]
pub struct BatchWriterConfig {
    /// How often pending operations are cut into a batch.
    pub interval: Duration,
}

impl Default for BatchWriterConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
        }
    }
}

/// Peek, write, anchor, then remove.
///
/// Clones share one lock, so at most one cut runs at a time.
#[derive(Clone)]
struct Cutter {
    protocol: Arc<dyn ProtocolClient>,
    blockchain: Arc<dyn BlockchainClient>,
    cas: Arc<dyn ContentStore>,
    queue: Arc<dyn OperationQueue>,
    cutting: Arc<Mutex<()>>,
}

impl Cutter {
    fn cut(&self) -> CoreResult<Option<AnchoredTransaction>> {
        let _cutting = self.cutting.lock().expect("batch lock poisoned");
        let max = self.protocol.current().max_operations_per_batch;
        let operations = self.queue.peek(max)?;
        if operations.is_empty() {
            return Ok(None);
        }
        let count = operations.len();
        let batch = BatchFile { operations };
        let address = self.cas.write(&batch.to_bytes()?)?;
        let txn = self.blockchain.write_anchor(&address)?;
        self.queue.remove(count)?;
        info!(
            operations = count,
            address = %address,
            transaction = txn.transaction_number,
            "batch anchored"
        );
        Ok(Some(txn))
    }

    /// Cut until the queue is empty or a cut fails.
    fn drain(&self) {
        loop {
            match self.cut() {
                Ok(Some(_)) => continue,
                Ok(None) => break,
                Err(e) => {
                    error!(error = %e, pending = self.queue.len(), "failed to cut batch");
                    break;
                }
            }
        }
    }
}

/// Background worker that drains the operation queue into the CAS and the
/// anchoring ledger on a fixed interval.
///
/// Stopping performs one last drain before the task exits.
pub struct BatchWriter {
    namespace: String,
    cutter: Cutter,
    config: BatchWriterConfig,
    worker: WorkerTask,
}

impl BatchWriter {
    pub fn new(
        namespace: impl Into<String>,
        ctx: &dyn BatchContext,
        config: BatchWriterConfig,
    ) -> CoreResult<Self> {
        let namespace = namespace.into();
        if namespace.is_empty() {
            return Err(CoreError::Worker("batch writer namespace is empty".into()));
        }
        if config.interval.is_zero() {
            return Err(CoreError::Worker("batch interval must be non-zero".into()));
        }
        Ok(Self {
            namespace,
            cutter: Cutter {
                protocol: ctx.protocol(),
                blockchain: ctx.blockchain(),
                cas: ctx.cas(),
                queue: ctx.operation_queue(),
                cutting: Arc::new(Mutex::new(())),
            },
            config,
            worker: WorkerTask::new("batch writer"),
        })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn state(&self) -> ComponentState {
        self.worker.state()
    }

    /// Spawn the batching loop. Must be called from within a tokio runtime.
    pub fn start(&self) -> CoreResult<()> {
        let cutter = self.cutter.clone();
        let interval = self.config.interval;
        self.worker.spawn(move |stop| run(cutter, interval, stop))
    }

    /// Stop the loop and wait for its final drain to finish.
    pub async fn stop(&self) -> CoreResult<()> {
        self.worker.stop().await
    }

    /// Cut and anchor one batch immediately. Safe to call while the loop
    /// is running; cuts never overlap.
    pub fn cut_batch(&self) -> CoreResult<Option<AnchoredTransaction>> {
        self.cutter.cut()
    }

    /// Operations still waiting to be batched.
    pub fn pending(&self) -> usize {
        self.cutter.queue.len()
    }
}

impl OperationSubmitter for BatchWriter {
    fn submit(&self, operation: Operation) -> CoreResult<()> {
        if !self.worker.is_running() {
            return Err(CoreError::Worker(format!(
                "batch writer is {}, not accepting operations",
                self.worker.state()
            )));
        }
        let pending = self.cutter.queue.enqueue(operation)?;
        debug!(namespace = %self.namespace, pending, "operation queued");
        Ok(())
    }
}

impl std::fmt::Debug for BatchWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchWriter")
            .field("namespace", &self.namespace)
            .field("interval", &self.config.interval)
            .field("state", &self.state())
            .finish()
    }
}

async fn run(cutter: Cutter, interval: Duration, mut stop: StopSignal) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            _ = &mut stop => break,
            _ = ticker.tick() => cutter.drain(),
        }
    }
    cutter.drain();
}
