use std::sync::RwLock;

use sidetree_types::{Address, AnchoredTransaction};
use tracing::debug;

use crate::error::CoreResult;

/// Anchoring ledger the batch writer writes to and the observer watches.
pub trait BlockchainClient: Send + Sync {
    /// Anchor a batch file address. Returns the recorded transaction.
    fn write_anchor(&self, anchor: &Address) -> CoreResult<AnchoredTransaction>;

    /// Transactions with a number greater than `since`, oldest first.
    /// `None` reads from the beginning of the ledger.
    fn read(&self, since: Option<u64>) -> CoreResult<Vec<AnchoredTransaction>>;
}

/// Append-only in-memory ledger. Transaction numbers start at zero.
#[derive(Default)]
pub struct InMemoryBlockchain {
    transactions: RwLock<Vec<AnchoredTransaction>>,
}

impl InMemoryBlockchain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.transactions.read().expect("ledger lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl BlockchainClient for InMemoryBlockchain {
    fn write_anchor(&self, anchor: &Address) -> CoreResult<AnchoredTransaction> {
        let mut txns = self.transactions.write().expect("ledger lock poisoned");
        let txn = AnchoredTransaction {
            transaction_number: txns.len() as u64,
            anchor_address: anchor.clone(),
        };
        txns.push(txn.clone());
        debug!(transaction = txn.transaction_number, anchor = %anchor, "anchored batch");
        Ok(txn)
    }

    fn read(&self, since: Option<u64>) -> CoreResult<Vec<AnchoredTransaction>> {
        let txns = self.transactions.read().expect("ledger lock poisoned");
        let start = since.map_or(0, |n| (n as usize).saturating_add(1));
        Ok(txns.iter().skip(start).cloned().collect())
    }
}

impl std::fmt::Debug for InMemoryBlockchain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryBlockchain")
            .field("transactions", &self.len())
            .finish()
    }
}
