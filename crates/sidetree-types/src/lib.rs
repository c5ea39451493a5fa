//! Foundation types for the Sidetree node.
//!
//! Every other crate in the workspace depends on `sidetree-types`.
//!
//! # Key Types
//!
//! - [`HashAlgorithm`] -- Supported multihash algorithm codes
//! - [`Multihash`] -- Algorithm-tagged digest (`code ‖ length ‖ digest`)
//! - [`Address`] -- base64url (unpadded) text encoding of a multihash
//! - [`Request`] / [`Payload`] -- Enveloped create/update/delete requests
//! - [`Operation`] / [`BatchFile`] -- Operations as queued, batched, and anchored
//! - [`ComponentState`] / [`Lifecycle`] -- Checked start/stop transitions

pub mod address;
pub mod encoding;
pub mod error;
pub mod lifecycle;
pub mod model;
pub mod multihash;

pub use address::Address;
pub use error::TypeError;
pub use lifecycle::{ComponentState, Lifecycle, LifecycleError};
pub use model::{
    AnchoredTransaction, BatchFile, Header, Operation, OperationType, Payload, Request,
};
pub use multihash::{HashAlgorithm, Multihash};
