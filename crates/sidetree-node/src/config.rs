use std::path::PathBuf;
use std::time::Duration;

use sidetree_core::ProtocolParameters;
use sidetree_server::ServerConfig;
use sidetree_types::HashAlgorithm;

use crate::cli::Cli;
use crate::error::{NodeError, NodeResult};

/// Validated node settings, passed explicitly to everything that needs them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeConfig {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    /// Raw multihash code; checked when the node context is built.
    pub hash_algorithm: u64,
    pub batch_interval: Duration,
    pub observer_interval: Duration,
    pub max_batch_operations: usize,
    pub max_operation_size: usize,
    pub log_level: String,
}

impl NodeConfig {
    /// Defaults for everything but the listener port and database path.
    pub fn new(port: u16, db_path: impl Into<PathBuf>) -> Self {
        let protocol = ProtocolParameters::default();
        Self {
            host: "0.0.0.0".into(),
            port,
            db_path: db_path.into(),
            hash_algorithm: protocol.hash_algorithm.code(),
            batch_interval: Duration::from_secs(1),
            observer_interval: Duration::from_secs(1),
            max_batch_operations: protocol.max_operations_per_batch,
            max_operation_size: protocol.max_operation_size,
            log_level: "info".into(),
        }
    }

    /// Protocol parameters described by this configuration.
    pub fn protocol_parameters(&self) -> NodeResult<ProtocolParameters> {
        let hash_algorithm = HashAlgorithm::from_code(self.hash_algorithm)
            .map_err(|e| NodeError::Configuration(e.to_string()))?;
        let parameters = ProtocolParameters {
            hash_algorithm,
            max_operations_per_batch: self.max_batch_operations,
            max_operation_size: self.max_operation_size,
        };
        parameters
            .validate()
            .map_err(|e| NodeError::Configuration(e.to_string()))?;
        Ok(parameters)
    }

    pub fn server_config(&self) -> ServerConfig {
        ServerConfig::new(self.host.clone(), self.port)
    }
}

impl TryFrom<Cli> for NodeConfig {
    type Error = NodeError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        let port = match cli.port {
            Some(port) if port != 0 => port,
            _ => {
                return Err(NodeError::Configuration(
                    "SIDETREE_MOCK_PORT is not set".into(),
                ))
            }
        };
        let db_path = match cli.dbpath {
            Some(path) if !path.as_os_str().is_empty() => path,
            _ => {
                return Err(NodeError::Configuration(
                    "SIDETREE_MOCK_DBPATH is not set".into(),
                ))
            }
        };
        if cli.batch_interval_ms == 0 || cli.observer_interval_ms == 0 {
            return Err(NodeError::Configuration(
                "batch and observer intervals must be non-zero".into(),
            ));
        }
        Ok(Self {
            host: cli.host,
            port,
            db_path,
            hash_algorithm: cli.hash_algorithm,
            batch_interval: Duration::from_millis(cli.batch_interval_ms),
            observer_interval: Duration::from_millis(cli.observer_interval_ms),
            max_batch_operations: cli.max_batch_operations,
            max_operation_size: cli.max_operation_size,
            log_level: cli.log_level,
        })
    }
}
