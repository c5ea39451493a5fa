//! Sidetree node runtime.
//!
//! Turns a [`NodeConfig`] into a running [`Node`]: opens the content store,
//! wires the [`NodeContext`](sidetree_core::NodeContext), starts the batch
//! writer, the observer and the document service, and stops them again in a
//! fixed order on shutdown.

pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod orchestrator;
pub mod signal;

pub use cli::Cli;
pub use config::NodeConfig;
pub use context::build_context;
pub use error::{NodeError, NodeResult};
pub use orchestrator::{
    run_shutdown, Node, ShutdownFailure, ShutdownReport, StopError, Stoppable, DID_NAMESPACE,
    DOCUMENT_PATH,
};
pub use signal::wait_for_termination;
