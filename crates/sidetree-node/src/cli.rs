use std::path::PathBuf;

use clap::Parser;

/// Every setting is a flag and a `SIDETREE_MOCK_*` environment variable.
#[derive(Parser, Clone, Debug)]
#[command(
    name = "sidetree-node",
    about = "Sidetree DID node with an in-memory anchoring ledger",
    version
)]
pub struct Cli {
    /// Interface the document service binds to
    #[arg(long, env = "SIDETREE_MOCK_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port the document service binds to (required)
    #[arg(long, env = "SIDETREE_MOCK_PORT")]
    pub port: Option<u16>,

    /// Directory of the content store database (required)
    #[arg(long, env = "SIDETREE_MOCK_DBPATH")]
    pub dbpath: Option<PathBuf>,

    /// Multihash code used for unique suffixes and content addresses
    #[arg(long, env = "SIDETREE_MOCK_HASH_ALGORITHM", default_value_t = 18)]
    pub hash_algorithm: u64,

    /// Milliseconds between batch cuts
    #[arg(long, env = "SIDETREE_MOCK_BATCH_INTERVAL_MS", default_value_t = 1000)]
    pub batch_interval_ms: u64,

    /// Milliseconds between ledger polls
    #[arg(long, env = "SIDETREE_MOCK_OBSERVER_INTERVAL_MS", default_value_t = 1000)]
    pub observer_interval_ms: u64,

    /// Maximum operations per batch file
    #[arg(long, env = "SIDETREE_MOCK_MAX_BATCH_OPERATIONS", default_value_t = 100)]
    pub max_batch_operations: usize,

    /// Maximum encoded payload size of one operation, in bytes
    #[arg(long, env = "SIDETREE_MOCK_MAX_OPERATION_SIZE", default_value_t = 2000)]
    pub max_operation_size: usize,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, env = "SIDETREE_MOCK_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}
