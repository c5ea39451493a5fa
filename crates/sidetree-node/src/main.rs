use clap::Parser;
use sidetree_node::{wait_for_termination, Cli, Node, NodeConfig};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let config = NodeConfig::try_from(cli)
        .inspect_err(|e| error!(error = %e, "invalid configuration"))?;
    let node = Node::start(config)
        .await
        .inspect_err(|e| error!(error = %e, "node failed to start"))?;

    info!("node running, waiting for SIGINT or SIGTERM");
    let report = node.run_until(wait_for_termination()).await;
    for failure in &report.failures {
        error!(component = failure.component, error = %failure.error, "not stopped cleanly");
    }
    Ok(())
}

/// `RUST_LOG` wins over the configured level.
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
