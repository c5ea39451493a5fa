use serde::{Deserialize, Serialize};
use sidetree_types::HashAlgorithm;

use crate::error::{CoreError, CoreResult};

/// Protocol constants consumed by the document layer and the batch writer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolParameters {
    /// Algorithm used to derive unique suffixes.
    pub hash_algorithm: HashAlgorithm,
    /// Upper bound on operations cut into one batch file.
    pub max_operations_per_batch: usize,
    /// Upper bound on the encoded payload of a single operation, in bytes.
    pub max_operation_size: usize,
}

impl ProtocolParameters {
    pub fn validate(&self) -> CoreResult<()> {
        if self.max_operations_per_batch == 0 {
            return Err(CoreError::Protocol(
                "max operations per batch must be greater than zero".into(),
            ));
        }
        if self.max_operation_size == 0 {
            return Err(CoreError::Protocol(
                "max operation size must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

impl Default for ProtocolParameters {
    fn default() -> Self {
        Self {
            hash_algorithm: HashAlgorithm::Sha2_256,
            max_operations_per_batch: 100,
            max_operation_size: 2000,
        }
    }
}

/// Source of the protocol parameters currently in force.
pub trait ProtocolClient: Send + Sync {
    fn current(&self) -> ProtocolParameters;
}

/// Protocol client with one fixed parameter set.
#[derive(Clone, Debug)]
pub struct StaticProtocolClient {
    parameters: ProtocolParameters,
}

impl StaticProtocolClient {
    pub fn new(parameters: ProtocolParameters) -> CoreResult<Self> {
        parameters.validate()?;
        Ok(Self { parameters })
    }

    pub(crate) fn unchecked(parameters: ProtocolParameters) -> Self {
        Self { parameters }
    }
}

impl Default for StaticProtocolClient {
    fn default() -> Self {
        Self {
            parameters: ProtocolParameters::default(),
        }
    }
}

impl ProtocolClient for StaticProtocolClient {
    fn current(&self) -> ProtocolParameters {
        self.parameters
    }
}
