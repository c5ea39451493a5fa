use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Hash algorithms that may tag a [`Multihash`].
///
/// The discriminants are the multicodec codes, so an algorithm round-trips
/// through its tag byte without a lookup table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
#[repr(u8)]
pub enum HashAlgorithm {
    Sha2_256 = 0x12,
    Sha2_512 = 0x13,
}

impl HashAlgorithm {
    /// The multicodec code used as the multihash tag.
    pub const fn code(self) -> u64 {
        self as u64
    }

    /// Digest length in bytes.
    pub const fn digest_len(self) -> usize {
        match self {
            Self::Sha2_256 => 32,
            Self::Sha2_512 => 64,
        }
    }

    /// Look up an algorithm by its multicodec code.
    pub fn from_code(code: u64) -> Result<Self, TypeError> {
        match code {
            0x12 => Ok(Self::Sha2_256),
            0x13 => Ok(Self::Sha2_512),
            other => Err(TypeError::UnsupportedAlgorithm(other)),
        }
    }
}

impl Default for HashAlgorithm {
    fn default() -> Self {
        Self::Sha2_256
    }
}

impl TryFrom<u64> for HashAlgorithm {
    type Error = TypeError;

    fn try_from(code: u64) -> Result<Self, Self::Error> {
        Self::from_code(code)
    }
}

impl From<HashAlgorithm> for u64 {
    fn from(alg: HashAlgorithm) -> Self {
        alg.code()
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sha2_256 => write!(f, "sha2-256"),
            Self::Sha2_512 => write!(f, "sha2-512"),
        }
    }
}

/// A digest tagged with the algorithm that produced it.
///
/// Binary layout is `code ‖ length ‖ digest`. Both supported codes and their
/// digest lengths fit in a single unsigned-varint byte, so the prefix is
/// always exactly two bytes.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Multihash {
    algorithm: HashAlgorithm,
    digest: Vec<u8>,
}

impl Multihash {
    /// Wrap a digest. The digest length must match the algorithm.
    pub fn new(algorithm: HashAlgorithm, digest: Vec<u8>) -> Result<Self, TypeError> {
        if digest.len() != algorithm.digest_len() {
            return Err(TypeError::InvalidMultihash(format!(
                "{algorithm} digest must be {} bytes, got {}",
                algorithm.digest_len(),
                digest.len()
            )));
        }
        Ok(Self { algorithm, digest })
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    pub fn digest(&self) -> &[u8] {
        &self.digest
    }

    /// Serialize to `code ‖ length ‖ digest`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(2 + self.digest.len());
        out.push(self.algorithm as u8);
        out.push(self.digest.len() as u8);
        out.extend_from_slice(&self.digest);
        out
    }

    /// Parse `code ‖ length ‖ digest`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TypeError> {
        let [code, len, digest @ ..] = bytes else {
            return Err(TypeError::InvalidMultihash(format!(
                "expected at least 2 bytes, got {}",
                bytes.len()
            )));
        };
        if code & 0x80 != 0 || len & 0x80 != 0 {
            return Err(TypeError::InvalidMultihash(
                "multi-byte varint prefixes are not supported".into(),
            ));
        }
        let algorithm = HashAlgorithm::from_code(u64::from(*code))?;
        if usize::from(*len) != digest.len() {
            return Err(TypeError::InvalidMultihash(format!(
                "length prefix {} does not match digest of {} bytes",
                len,
                digest.len()
            )));
        }
        Self::new(algorithm, digest.to_vec())
    }
}

impl fmt::Debug for Multihash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix: String = self.digest[..4].iter().map(|b| format!("{b:02x}")).collect();
        write!(f, "Multihash({}:{}..)", self.algorithm, prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha2_256_code_is_eighteen() {
        assert_eq!(HashAlgorithm::Sha2_256.code(), 18);
        assert_eq!(HashAlgorithm::default(), HashAlgorithm::Sha2_256);
    }

    #[test]
    fn unknown_code_rejected() {
        assert_eq!(
            HashAlgorithm::from_code(0x11),
            Err(TypeError::UnsupportedAlgorithm(0x11))
        );
    }

    #[test]
    fn bytes_layout() {
        let mh = Multihash::new(HashAlgorithm::Sha2_256, vec![7; 32]).unwrap();
        let bytes = mh.to_bytes();
        assert_eq!(bytes.len(), 34);
        assert_eq!(bytes[0], 0x12);
        assert_eq!(bytes[1], 32);
        assert_eq!(Multihash::from_bytes(&bytes).unwrap(), mh);
    }

    #[test]
    fn wrong_digest_length_rejected() {
        assert!(Multihash::new(HashAlgorithm::Sha2_512, vec![0; 32]).is_err());
    }

    #[test]
    fn truncated_bytes_rejected() {
        let mh = Multihash::new(HashAlgorithm::Sha2_256, vec![1; 32]).unwrap();
        let bytes = mh.to_bytes();
        assert!(Multihash::from_bytes(&bytes[..20]).is_err());
        assert!(Multihash::from_bytes(&bytes[..1]).is_err());
        assert!(Multihash::from_bytes(&[]).is_err());
    }

    #[test]
    fn varint_continuation_rejected() {
        let mut bytes = vec![0x92, 0x01, 32];
        bytes.extend_from_slice(&[0; 32]);
        assert!(Multihash::from_bytes(&bytes).is_err());
    }

    #[test]
    fn algorithm_serde_as_code() {
        let json = serde_json::to_string(&HashAlgorithm::Sha2_256).unwrap();
        assert_eq!(json, "18");
        let parsed: HashAlgorithm = serde_json::from_str("19").unwrap();
        assert_eq!(parsed, HashAlgorithm::Sha2_512);
        assert!(serde_json::from_str::<HashAlgorithm>("1").is_err());
    }
}
