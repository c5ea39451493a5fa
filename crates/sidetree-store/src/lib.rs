//! Content-addressable storage for the Sidetree node.
//!
//! Blobs are stored under the base64url-encoded multihash of their bytes.
//! The CAS never trusts what it wrote earlier: every read recomputes the
//! digest and compares it against the address, so silent corruption of the
//! backing engine surfaces as [`StoreError::Integrity`].
//!
//! # Engines
//!
//! All backends implement the [`KvEngine`] trait:
//!
//! - [`InMemoryEngine`] -- `HashMap`-based engine for tests and embedding
//! - [`SledEngine`] -- durable on-disk engine with an explicit close
//!
//! # Design Rules
//!
//! 1. The address is a pure function of content and hash algorithm.
//! 2. Writes overwrite by address; rewriting identical content is a no-op in effect.
//! 3. Engines provide atomic per-key get/put. The CAS adds no locking of its own.
//! 4. The store never interprets blob contents.
//! 5. All engine errors are propagated, never silently ignored.

pub mod cas;
pub mod disk;
pub mod error;
pub mod memory;
pub mod traits;

pub use cas::ContentAddressedStore;
pub use disk::SledEngine;
pub use error::{StoreError, StoreResult};
pub use memory::InMemoryEngine;
pub use traits::{ContentStore, KvEngine};
