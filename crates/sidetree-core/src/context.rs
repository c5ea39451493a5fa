use std::sync::Arc;

use sidetree_store::{ContentAddressedStore, ContentStore, InMemoryEngine};

use crate::batch::BatchContext;
use crate::blockchain::{BlockchainClient, InMemoryBlockchain};
use crate::opqueue::{MemQueue, OperationQueue};
use crate::opstore::{InMemoryOperationStore, OperationStore};
use crate::protocol::{ProtocolClient, ProtocolParameters, StaticProtocolClient};

/// The composed set of capability handles shared by every worker and handler.
///
/// Built once and never mutated. Consumers take the one or two handles they
/// need through the accessors (or through [`BatchContext`]) rather than the
/// whole aggregate.
#[derive(Clone)]
pub struct NodeContext {
    protocol: Arc<dyn ProtocolClient>,
    cas: Arc<dyn ContentStore>,
    blockchain: Arc<dyn BlockchainClient>,
    operation_store: Arc<dyn OperationStore>,
    operation_queue: Arc<dyn OperationQueue>,
}

impl NodeContext {
    pub fn new(
        protocol: Arc<dyn ProtocolClient>,
        cas: Arc<dyn ContentStore>,
        blockchain: Arc<dyn BlockchainClient>,
        operation_store: Arc<dyn OperationStore>,
        operation_queue: Arc<dyn OperationQueue>,
    ) -> Self {
        Self {
            protocol,
            cas,
            blockchain,
            operation_store,
            operation_queue,
        }
    }

    /// Everything in memory, including the CAS engine. Parameters are taken
    /// as given; use [`StaticProtocolClient::new`] to validate them.
    pub fn in_memory(parameters: ProtocolParameters) -> Self {
        let engine = Arc::new(InMemoryEngine::new());
        Self::new(
            Arc::new(StaticProtocolClient::unchecked(parameters)),
            Arc::new(ContentAddressedStore::with_algorithm(
                engine,
                parameters.hash_algorithm,
            )),
            Arc::new(InMemoryBlockchain::new()),
            Arc::new(InMemoryOperationStore::new()),
            Arc::new(MemQueue::new()),
        )
    }

    pub fn protocol(&self) -> Arc<dyn ProtocolClient> {
        Arc::clone(&self.protocol)
    }

    pub fn cas(&self) -> Arc<dyn ContentStore> {
        Arc::clone(&self.cas)
    }

    pub fn blockchain(&self) -> Arc<dyn BlockchainClient> {
        Arc::clone(&self.blockchain)
    }

    pub fn operation_store(&self) -> Arc<dyn OperationStore> {
        Arc::clone(&self.operation_store)
    }

    pub fn operation_queue(&self) -> Arc<dyn OperationQueue> {
        Arc::clone(&self.operation_queue)
    }
}

impl BatchContext for NodeContext {
    fn protocol(&self) -> Arc<dyn ProtocolClient> {
        Arc::clone(&self.protocol)
    }

    fn blockchain(&self) -> Arc<dyn BlockchainClient> {
        Arc::clone(&self.blockchain)
    }

    fn cas(&self) -> Arc<dyn ContentStore> {
        Arc::clone(&self.cas)
    }

    fn operation_queue(&self) -> Arc<dyn OperationQueue> {
        Arc::clone(&self.operation_queue)
    }
}

impl std::fmt::Debug for NodeContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeContext")
            .field("protocol", &self.protocol.current())
            .field("pending_operations", &self.operation_queue.len())
            .finish_non_exhaustive()
    }
}
