//! Document identifier derivation.
//!
//! A document's unique suffix is the content address of its encoded create
//! payload, and its identifier is that suffix qualified by a namespace. The
//! same payload therefore yields one suffix but a distinct identifier per
//! namespace.

use sidetree_types::{Address, HashAlgorithm};

use crate::hasher::ContentHasher;

/// Address of the encoded create payload (the payload string's bytes).
pub fn calculate_unique_suffix(encoded_payload: &str, algorithm: HashAlgorithm) -> Address {
    ContentHasher::new(algorithm).address(encoded_payload.as_bytes())
}

/// `namespace:uniqueSuffix` for an encoded create payload.
pub fn calculate_id(namespace: &str, encoded_payload: &str, algorithm: HashAlgorithm) -> String {
    format!(
        "{namespace}:{}",
        calculate_unique_suffix(encoded_payload, algorithm)
    )
}
