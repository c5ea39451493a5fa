use std::sync::Arc;

use sidetree_crypto::ContentHasher;
use sidetree_types::{Address, HashAlgorithm};
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};
use crate::traits::{ContentStore, KvEngine};

/// Verifying content-addressable store over any [`KvEngine`].
///
/// Writes hash with the configured algorithm. Reads verify with whichever
/// algorithm the address is tagged with, so content written under an older
/// default stays readable after the default changes.
pub struct ContentAddressedStore<E: KvEngine> {
    engine: Arc<E>,
    hasher: ContentHasher,
}

impl<E: KvEngine> ContentAddressedStore<E> {
    /// A store that addresses content by SHA-256.
    pub fn new(engine: Arc<E>) -> Self {
        Self::with_algorithm(engine, HashAlgorithm::Sha2_256)
    }

    pub fn with_algorithm(engine: Arc<E>, algorithm: HashAlgorithm) -> Self {
        Self {
            engine,
            hasher: ContentHasher::new(algorithm),
        }
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.hasher.algorithm()
    }

    /// The backing engine.
    pub fn engine(&self) -> &Arc<E> {
        &self.engine
    }
}

impl<E: KvEngine> ContentStore for ContentAddressedStore<E> {
    fn write(&self, content: &[u8]) -> StoreResult<Address> {
        let address = self.hasher.address(content);
        self.engine.put(address.as_ref(), content)?;
        debug!(address = %address, size = content.len(), "added content");
        Ok(address)
    }

    fn read(&self, address: &Address) -> StoreResult<Vec<u8>> {
        let content = self
            .engine
            .get(address.as_ref())?
            .ok_or_else(|| StoreError::NotFound(address.clone()))?;

        let expected = address.decode().map_err(|source| StoreError::InvalidAddress {
            address: address.clone(),
            source,
        })?;

        if !ContentHasher::verify(&content, &expected) {
            let computed = Address::from_multihash(&ContentHasher::multihash(
                expected.algorithm(),
                &content,
            ));
            warn!(address = %address, computed = %computed, "content failed integrity check");
            return Err(StoreError::Integrity {
                address: address.clone(),
                expected: Address::from_multihash(&expected),
                computed,
            });
        }

        Ok(content)
    }
}

impl<E: KvEngine> std::fmt::Debug for ContentAddressedStore<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentAddressedStore")
            .field("algorithm", &self.algorithm())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryEngine;
    use crate::SledEngine;
    use proptest::prelude::*;

    fn memory_store() -> ContentAddressedStore<InMemoryEngine> {
        ContentAddressedStore::new(Arc::new(InMemoryEngine::new()))
    }

    /// Engine whose writes always fail.
    struct BrokenEngine;

    impl KvEngine for BrokenEngine {
        fn get(&self, _key: &[u8]) -> StoreResult<Option<Vec<u8>>> {
            Err(StoreError::Storage("disk unavailable".into()))
        }

        fn put(&self, _key: &[u8], _value: &[u8]) -> StoreResult<()> {
            Err(StoreError::Storage("disk unavailable".into()))
        }
    }

    // -----------------------------------------------------------------------
    // Write / read
    // -----------------------------------------------------------------------

    #[test]
    fn write_and_read() {
        let store = memory_store();
        let address = store.write(b"hello world").unwrap();
        assert_eq!(store.read(&address).unwrap(), b"hello world");
    }

    #[test]
    fn address_is_tagged_sha256() {
        let store = memory_store();
        let address = store.write(b"content").unwrap();
        let mh = address.decode().unwrap();
        assert_eq!(mh.algorithm(), HashAlgorithm::Sha2_256);
        assert_eq!(mh.algorithm().code(), 18);
        assert!(!address.as_str().contains('='));
    }

    #[test]
    fn rewrite_is_idempotent() {
        let store = memory_store();
        let a1 = store.write(b"same").unwrap();
        let a2 = store.write(b"same").unwrap();
        assert_eq!(a1, a2);
        assert_eq!(store.engine().len(), 1);
    }

    #[test]
    fn sha512_store_reads_sha256_content() {
        let engine = Arc::new(InMemoryEngine::new());
        let old = ContentAddressedStore::new(Arc::clone(&engine));
        let address = old.write(b"legacy").unwrap();

        let new = ContentAddressedStore::with_algorithm(engine, HashAlgorithm::Sha2_512);
        assert_eq!(new.read(&address).unwrap(), b"legacy");
        assert_ne!(new.write(b"legacy").unwrap(), address);
    }

    // -----------------------------------------------------------------------
    // Failure modes
    // -----------------------------------------------------------------------

    #[test]
    fn missing_address_is_not_found() {
        let store = memory_store();
        let address = ContentHasher::SHA2_256.address(b"never written");
        assert!(matches!(store.read(&address), Err(StoreError::NotFound(a)) if a == address));
    }

    #[test]
    fn tampered_content_fails_integrity() {
        let store = memory_store();
        let address = store.write(b"original").unwrap();
        store.engine().put(address.as_ref(), b"tampered").unwrap();

        match store.read(&address) {
            Err(StoreError::Integrity {
                address: a,
                expected,
                computed,
            }) => {
                assert_eq!(a, address);
                assert_eq!(expected, address);
                assert_eq!(computed, ContentHasher::SHA2_256.address(b"tampered"));
            }
            other => panic!("expected integrity error, got {other:?}"),
        }
    }

    #[test]
    fn undecodable_key_with_content_is_invalid_address() {
        let store = memory_store();
        store.engine().put(b"not-a-multihash", b"data").unwrap();
        let err = store.read(&Address::from("not-a-multihash")).unwrap_err();
        assert!(matches!(err, StoreError::InvalidAddress { .. }));
    }

    #[test]
    fn engine_write_failure_is_storage_error() {
        let store = ContentAddressedStore::new(Arc::new(BrokenEngine));
        let err = store.write(b"data").unwrap_err();
        assert!(err.is_storage());
    }

    #[test]
    fn engine_read_failure_is_storage_error() {
        let store = ContentAddressedStore::new(Arc::new(BrokenEngine));
        let address = ContentHasher::SHA2_256.address(b"data");
        assert!(store.read(&address).unwrap_err().is_storage());
    }

    #[test]
    fn sled_backed_roundtrip_and_tamper() {
        let dir = tempfile::tempdir().unwrap();
        let engine = Arc::new(SledEngine::open(dir.path()).unwrap());
        let store = ContentAddressedStore::new(Arc::clone(&engine));

        let address = store.write(b"durable").unwrap();
        assert_eq!(store.read(&address).unwrap(), b"durable");

        engine.put(address.as_ref(), b"flipped").unwrap();
        assert!(matches!(store.read(&address), Err(StoreError::Integrity { .. })));

        engine.close().unwrap();
        assert!(store.write(b"late").unwrap_err().is_storage());
    }

    #[test]
    fn concurrent_writers_and_readers() {
        let store = Arc::new(memory_store());
        let handles: Vec<_> = (0..8u8)
            .map(|i| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for j in 0..50u8 {
                        let blob = vec![i, j];
                        let address = store.write(&blob).unwrap();
                        assert_eq!(store.read(&address).unwrap(), blob);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(store.engine().len(), 400);
    }

    // -----------------------------------------------------------------------
    // Properties
    // -----------------------------------------------------------------------

    proptest! {
        #[test]
        fn read_returns_what_was_written(blob in proptest::collection::vec(any::<u8>(), 0..2048)) {
            let store = memory_store();
            let address = store.write(&blob).unwrap();
            prop_assert_eq!(store.read(&address).unwrap(), blob);
        }

        #[test]
        fn addresses_equal_iff_blobs_equal(
            a in proptest::collection::vec(any::<u8>(), 0..256),
            b in proptest::collection::vec(any::<u8>(), 0..256),
        ) {
            let store = memory_store();
            let addr_a = store.write(&a).unwrap();
            let addr_b = store.write(&b).unwrap();
            prop_assert_eq!(addr_a == addr_b, a == b);
        }

        #[test]
        fn any_modification_is_detected(
            blob in proptest::collection::vec(any::<u8>(), 1..256),
            index in any::<proptest::sample::Index>(),
        ) {
            let store = memory_store();
            let address = store.write(&blob).unwrap();
            let mut corrupted = blob.clone();
            let i = index.index(corrupted.len());
            corrupted[i] ^= 0x01;
            store.engine().put(address.as_ref(), &corrupted).unwrap();
            let is_integrity_error = matches!(store.read(&address), Err(StoreError::Integrity { .. }));
            prop_assert!(is_integrity_error);
        }
    }
}
