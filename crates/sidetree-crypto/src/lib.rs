//! Cryptographic primitives for the Sidetree node.
//!
//! Provides algorithm-tagged SHA-2 hashing ([`ContentHasher`]) and the
//! derivation of document identifiers from encoded create payloads.
//!
//! Digests come from `sha2`; nothing here implements a primitive itself.

pub mod hasher;
pub mod id;

pub use hasher::ContentHasher;
pub use id::{calculate_id, calculate_unique_suffix};
