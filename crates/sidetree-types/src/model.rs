//! Wire and storage model for document operations.
//!
//! These types only describe shape. Validation and document assembly live in
//! `sidetree-core`.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::address::Address;
use crate::encoding;
use crate::error::TypeError;

/// Protected header of a request envelope.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub alg: String,
    pub kid: String,
}

/// Enveloped request as received on the update route.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protected: Option<Header>,
    /// base64url-encoded JSON [`Payload`].
    pub payload: String,
    #[serde(default)]
    pub signature: String,
}

impl Request {
    /// Decode the envelope's payload.
    pub fn decode_payload(&self) -> Result<Payload, TypeError> {
        let bytes = encoding::decode_string(&self.payload)?;
        serde_json::from_slice(&bytes).map_err(|e| TypeError::Serialization(e.to_string()))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationType {
    Create,
    Update,
    Delete,
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => write!(f, "create"),
            Self::Update => write!(f, "update"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// Decoded request payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payload {
    #[serde(rename = "type")]
    pub operation: OperationType,
    /// base64url-encoded JSON document (create and update).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub did_document: Option<String>,
    /// Target of an update or delete.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub did_unique_suffix: Option<String>,
}

impl Payload {
    /// A create payload for the given document JSON.
    pub fn create(document: &str) -> Self {
        Self {
            operation: OperationType::Create,
            did_document: Some(encoding::encode_to_string(document.as_bytes())),
            did_unique_suffix: None,
        }
    }

    /// Encode as the base64url string carried in [`Request::payload`].
    pub fn encode(&self) -> Result<String, TypeError> {
        let bytes = serde_json::to_vec(self).map_err(|e| TypeError::Serialization(e.to_string()))?;
        Ok(encoding::encode_to_string(&bytes))
    }

    /// Decode and parse the embedded document, if any.
    pub fn decode_document(&self) -> Result<Option<Value>, TypeError> {
        let Some(encoded) = &self.did_document else {
            return Ok(None);
        };
        let bytes = encoding::decode_string(encoded)?;
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| TypeError::Serialization(e.to_string()))
    }
}

/// An operation as it moves through queue, batch file, and operation store.
///
/// `transaction_number` and `operation_index` are zero until the observer
/// assigns them from the anchoring transaction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    #[serde(rename = "type")]
    pub operation: OperationType,
    /// Fully qualified identifier: `namespace:uniqueSuffix`.
    pub id: String,
    pub unique_suffix: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<Value>,
    pub encoded_payload: String,
    #[serde(default)]
    pub transaction_number: u64,
    #[serde(default)]
    pub operation_index: u32,
}

/// Batch of operations written to the CAS and anchored by address.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchFile {
    pub operations: Vec<Operation>,
}

impl BatchFile {
    pub fn to_bytes(&self) -> Result<Vec<u8>, TypeError> {
        serde_json::to_vec(self).map_err(|e| TypeError::Serialization(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TypeError> {
        serde_json::from_slice(bytes).map_err(|e| TypeError::Serialization(e.to_string()))
    }
}

/// A batch anchor as recorded on the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnchoredTransaction {
    pub transaction_number: u64,
    pub anchor_address: Address,
}
