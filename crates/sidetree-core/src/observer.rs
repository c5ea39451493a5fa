use std::sync::{Arc, Mutex};
use std::time::Duration;

use sidetree_store::{ContentStore, StoreError};
use sidetree_types::{AnchoredTransaction, BatchFile, ComponentState, Operation};
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use crate::blockchain::BlockchainClient;
use crate::error::{CoreError, CoreResult};
use crate::opstore::OperationStore;
use crate::worker::{StopSignal, WorkerTask};

#[derive(Clone, Debug)]
pub struct ObserverConfig {
    /// How often the ledger is polled for new anchors.
    pub interval: Duration,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
        }
    }
}

#[derive(Clone)]
struct Poller {
    blockchain: Arc<dyn BlockchainClient>,
    cas: Arc<dyn ContentStore>,
    operation_store: Arc<dyn OperationStore>,
    last_processed: Arc<Mutex<Option<u64>>>,
}

impl Poller {
    /// Process every transaction anchored since the last processed one.
    ///
    /// A batch whose content fails its integrity check or does not decode is
    /// logged and skipped for good. Any other failure is retried on the next
    /// poll; transactions after it are not processed out of order.
    fn poll(&self) -> CoreResult<usize> {
        let since = *self.last_processed.lock().expect("observer lock poisoned");
        let mut applied = 0;
        for txn in self.blockchain.read(since)? {
            let operations = match self.fetch(&txn) {
                Ok(operations) => operations,
                Err(e) if is_permanent(&e) => {
                    error!(
                        transaction = txn.transaction_number,
                        anchor = %txn.anchor_address,
                        error = %e,
                        "skipping unreadable batch"
                    );
                    self.mark_processed(txn.transaction_number);
                    continue;
                }
                Err(e) => return Err(e),
            };
            let count = operations.len();
            self.operation_store.put(operations)?;
            self.mark_processed(txn.transaction_number);
            debug!(
                transaction = txn.transaction_number,
                operations = count,
                "applied anchored batch"
            );
            applied += count;
        }
        Ok(applied)
    }

    /// Read and decode the batch a transaction anchors, stamping each
    /// operation with its ledger position.
    fn fetch(&self, txn: &AnchoredTransaction) -> CoreResult<Vec<Operation>> {
        let bytes = self.cas.read(&txn.anchor_address)?;
        let batch = BatchFile::from_bytes(&bytes)?;
        Ok(batch
            .operations
            .into_iter()
            .enumerate()
            .map(|(index, mut op)| {
                op.transaction_number = txn.transaction_number;
                op.operation_index = index as u32;
                op
            })
            .collect())
    }

    fn mark_processed(&self, transaction_number: u64) {
        *self.last_processed.lock().expect("observer lock poisoned") = Some(transaction_number);
    }
}

/// Failures that reading the same anchor again cannot fix.
fn is_permanent(error: &CoreError) -> bool {
    matches!(
        error,
        CoreError::Store(StoreError::Integrity { .. } | StoreError::InvalidAddress { .. })
            | CoreError::Type(_)
    )
}

/// Background worker that follows the anchoring ledger and moves anchored
/// operations into the operation store.
pub struct Observer {
    poller: Poller,
    config: ObserverConfig,
    worker: WorkerTask,
}

impl Observer {
    pub fn new(
        blockchain: Arc<dyn BlockchainClient>,
        cas: Arc<dyn ContentStore>,
        operation_store: Arc<dyn OperationStore>,
        config: ObserverConfig,
    ) -> CoreResult<Self> {
        if config.interval.is_zero() {
            return Err(CoreError::Worker("observer interval must be non-zero".into()));
        }
        Ok(Self {
            poller: Poller {
                blockchain,
                cas,
                operation_store,
                last_processed: Arc::new(Mutex::new(None)),
            },
            config,
            worker: WorkerTask::new("observer"),
        })
    }

    pub fn state(&self) -> ComponentState {
        self.worker.state()
    }

    /// Number of the last transaction applied or skipped, if any.
    pub fn last_processed(&self) -> Option<u64> {
        *self.poller.last_processed.lock().expect("observer lock poisoned")
    }

    /// Spawn the polling loop. Must be called from within a tokio runtime.
    pub fn start(&self) -> CoreResult<()> {
        let poller = self.poller.clone();
        let interval = self.config.interval;
        self.worker.spawn(move |stop| run(poller, interval, stop))
    }

    pub async fn stop(&self) -> CoreResult<()> {
        self.worker.stop().await
    }

    /// Poll once immediately. Returns the number of operations applied.
    pub fn poll(&self) -> CoreResult<usize> {
        self.poller.poll()
    }
}

impl std::fmt::Debug for Observer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observer")
            .field("interval", &self.config.interval)
            .field("last_processed", &self.last_processed())
            .field("state", &self.state())
            .finish()
    }
}

async fn run(poller: Poller, interval: Duration, mut stop: StopSignal) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            _ = &mut stop => break,
            _ = ticker.tick() => match poller.poll() {
                Ok(0) => {}
                Ok(applied) => info!(operations = applied, "observer applied operations"),
                Err(e) => warn!(error = %e, "observer poll failed"),
            },
        }
    }
}
