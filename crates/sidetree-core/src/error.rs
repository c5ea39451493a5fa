use sidetree_types::{LifecycleError, TypeError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// The request could not be decoded or is structurally incomplete.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The request decoded but violates document or operation rules.
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid protocol parameters: {0}")]
    Protocol(String),

    #[error("blockchain error: {0}")]
    Blockchain(String),

    /// A background worker could not run, or is not running.
    #[error("worker error: {0}")]
    Worker(String),

    #[error("lifecycle error: {0}")]
    Lifecycle(#[from] LifecycleError),

    #[error("store error: {0}")]
    Store(#[from] sidetree_store::StoreError),

    #[error("type error: {0}")]
    Type(#[from] TypeError),
}

pub type CoreResult<T> = Result<T, CoreError>;
