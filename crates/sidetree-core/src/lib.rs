//! Collaborators of the Sidetree node runtime.
//!
//! The node is wired from narrow capability traits, each with an in-memory
//! implementation that can be swapped by constructor injection:
//!
//! - [`ProtocolClient`] -- protocol parameters ([`StaticProtocolClient`])
//! - [`BlockchainClient`] -- anchoring ledger ([`InMemoryBlockchain`])
//! - [`OperationStore`] -- processed operations ([`InMemoryOperationStore`])
//! - [`OperationQueue`] -- pending operations ([`MemQueue`])
//! - [`ContentStore`](sidetree_store::ContentStore) -- batch files
//!
//! On top of these sit two background workers with a checked start/stop
//! lifecycle ([`BatchWriter`], [`Observer`]), a read model ([`Processor`]),
//! and the [`DocumentHandler`] served over HTTP.

pub mod batch;
pub mod blockchain;
pub mod context;
pub mod dochandler;
pub mod error;
pub mod observer;
pub mod opqueue;
pub mod opstore;
pub mod processor;
pub mod protocol;
pub mod validator;
mod worker;

pub use batch::{BatchContext, BatchWriter, BatchWriterConfig, OperationSubmitter};
pub use blockchain::{BlockchainClient, InMemoryBlockchain};
pub use context::NodeContext;
pub use dochandler::{DidDocumentHandler, DocumentHandler};
pub use error::{CoreError, CoreResult};
pub use observer::{Observer, ObserverConfig};
pub use opqueue::{MemQueue, OperationQueue};
pub use opstore::{InMemoryOperationStore, OperationStore};
pub use processor::Processor;
pub use protocol::{ProtocolClient, ProtocolParameters, StaticProtocolClient};
pub use validator::{DidValidator, DocumentValidator};
