use std::sync::Arc;

use sidetree_types::Address;

use crate::error::StoreResult;

/// Byte-keyed storage engine underneath the CAS.
///
/// Implementations must make each `get` and `put` atomic for its key. No
/// multi-key transactions are required.
pub trait KvEngine: Send + Sync {
    /// Returns `Ok(None)` if the key is absent.
    fn get(&self, key: &[u8]) -> StoreResult<Option<Vec<u8>>>;

    /// Insert or overwrite the value under `key`.
    fn put(&self, key: &[u8], value: &[u8]) -> StoreResult<()>;
}

impl<E: KvEngine + ?Sized> KvEngine for Arc<E> {
    fn get(&self, key: &[u8]) -> StoreResult<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn put(&self, key: &[u8], value: &[u8]) -> StoreResult<()> {
        (**self).put(key, value)
    }
}

/// Content-addressable store.
///
/// All implementations must satisfy these invariants:
/// - `write` is deterministic: identical bytes always produce the same address.
/// - `read` only returns bytes that hash to the address they were read from.
/// - There is no delete, update-in-place, or enumeration.
pub trait ContentStore: Send + Sync {
    /// Store a blob and return its address.
    fn write(&self, content: &[u8]) -> StoreResult<Address>;

    /// Fetch and verify the blob stored at `address`.
    ///
    /// Returns `StoreError::NotFound` if absent and `StoreError::Integrity`
    /// if the stored bytes do not match the address.
    fn read(&self, address: &Address) -> StoreResult<Vec<u8>>;
}
