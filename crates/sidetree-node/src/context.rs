use std::sync::Arc;

use sidetree_core::{
    InMemoryBlockchain, InMemoryOperationStore, MemQueue, NodeContext, StaticProtocolClient,
};
use sidetree_store::{ContentAddressedStore, KvEngine};
use tracing::debug;

use crate::config::NodeConfig;
use crate::error::{NodeError, NodeResult};

/// Wire the node's collaborators over an opened storage engine.
///
/// Protocol parameters are checked first; on error nothing is built.
pub fn build_context<E>(config: &NodeConfig, engine: Arc<E>) -> NodeResult<NodeContext>
where
    E: KvEngine + 'static,
{
    let parameters = config.protocol_parameters()?;
    let protocol = StaticProtocolClient::new(parameters)
        .map_err(|e| NodeError::Configuration(e.to_string()))?;
    let cas = ContentAddressedStore::with_algorithm(engine, parameters.hash_algorithm);
    debug!(
        algorithm = %parameters.hash_algorithm,
        max_batch = parameters.max_operations_per_batch,
        "node context built"
    );
    Ok(NodeContext::new(
        Arc::new(protocol),
        Arc::new(cas),
        Arc::new(InMemoryBlockchain::new()),
        Arc::new(InMemoryOperationStore::new()),
        Arc::new(MemQueue::new()),
    ))
}
