//! # Verifiable Raffle Node
//!
//! Runs the raffle on a development network until Ctrl+C.

use anyhow::{Context, Result};
use raffle_node::{NodeConfig, NodeRuntime};
use raffle_telemetry::{encode_metrics, init_telemetry, TelemetryConfig};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let telemetry = TelemetryConfig::from_env().context("Invalid telemetry configuration")?;
    init_telemetry(&telemetry).context("Failed to initialize telemetry")?;

    let config = NodeConfig::from_env().context("Failed to load node configuration")?;

    let runtime = NodeRuntime::new(config)?;
    runtime.start();

    info!("Node is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c().await?;

    runtime.shutdown().await;

    match encode_metrics() {
        Ok(metrics) => info!("Final metrics:\n{}", metrics),
        Err(e) => warn!(error = %e, "Failed to encode metrics"),
    }

    Ok(())
}
