use sidetree_types::LifecycleError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    /// Start or stop requested in a state that does not allow it.
    #[error("listener error: {0}")]
    Listener(#[from] LifecycleError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServerResult<T> = Result<T, ServerError>;
