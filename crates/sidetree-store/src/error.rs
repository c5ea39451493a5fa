use sidetree_types::{Address, TypeError};

/// Errors from content store and engine operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Nothing is stored under the address.
    #[error("content not found: {0}")]
    NotFound(Address),

    /// Stored bytes no longer hash to their address (data corruption).
    #[error("integrity check failed for {address}: expected {expected}, computed {computed}")]
    Integrity {
        address: Address,
        expected: Address,
        computed: Address,
    },

    /// The address does not decode to a supported multihash.
    #[error("invalid address {address}: {source}")]
    InvalidAddress {
        address: Address,
        #[source]
        source: TypeError,
    },

    /// The backing engine failed to open, read, write, or flush.
    #[error("storage engine error: {0}")]
    Storage(String),

    /// The engine handle has already been closed.
    #[error("storage engine is closed")]
    Closed,
}

impl StoreError {
    /// `true` for failures of the backing engine itself, as opposed to
    /// lookups and verification.
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage(_) | Self::Closed)
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
