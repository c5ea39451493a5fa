use sidetree_core::CoreError;
use sidetree_server::ServerError;
use sidetree_store::StoreError;
use thiserror::Error;

/// Errors that abort node startup.
#[derive(Debug, Error)]
pub enum NodeError {
    /// Missing or invalid settings, including protocol parameters.
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("failed to start {component}: {source}")]
    Startup {
        component: &'static str,
        #[source]
        source: CoreError,
    },

    #[error("listener error: {0}")]
    Listener(#[from] ServerError),
}

pub type NodeResult<T> = Result<T, NodeError>;
