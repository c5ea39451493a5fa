use sha2::{Digest, Sha256, Sha512};
use sidetree_types::{Address, HashAlgorithm, Multihash};

/// Algorithm-tagged content hasher.
///
/// Every digest is wrapped in a [`Multihash`], so the algorithm that produced
/// an address can always be recovered from the address itself. Verification
/// uses the algorithm named by the tag, not the hasher's own algorithm.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContentHasher {
    algorithm: HashAlgorithm,
}

impl ContentHasher {
    /// SHA-256 hasher (multihash code 0x12).
    pub const SHA2_256: Self = Self {
        algorithm: HashAlgorithm::Sha2_256,
    };
    /// SHA-512 hasher (multihash code 0x13).
    pub const SHA2_512: Self = Self {
        algorithm: HashAlgorithm::Sha2_512,
    };

    pub const fn new(algorithm: HashAlgorithm) -> Self {
        Self { algorithm }
    }

    /// Hash raw bytes into a multihash.
    pub fn hash(&self, data: &[u8]) -> Multihash {
        Self::multihash(self.algorithm, data)
    }

    /// Hash raw bytes and encode the multihash as an address.
    pub fn address(&self, data: &[u8]) -> Address {
        Address::from_multihash(&self.hash(data))
    }

    /// Verify that data produces the expected multihash, recomputing with the
    /// algorithm the expected value is tagged with.
    pub fn verify(data: &[u8], expected: &Multihash) -> bool {
        Self::multihash(expected.algorithm(), data) == *expected
    }

    /// The algorithm used by this hasher.
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Compute a multihash with an explicit algorithm.
    pub fn multihash(algorithm: HashAlgorithm, data: &[u8]) -> Multihash {
        let digest = match algorithm {
            HashAlgorithm::Sha2_256 => Sha256::digest(data).to_vec(),
            HashAlgorithm::Sha2_512 => Sha512::digest(data).to_vec(),
        };
        Multihash::new(algorithm, digest)
            .expect("sha2 output length always matches the algorithm digest length")
    }
}

impl Default for ContentHasher {
    fn default() -> Self {
        Self::SHA2_256
    }
}
