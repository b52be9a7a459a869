//! # Raffle Telemetry
//!
//! Logging and metrics for the raffle node.
//!
//! ## Components
//!
//! - **Logs**: `tracing-subscriber` with an env filter, plain or JSON output
//! - **Metrics**: Prometheus registry, encoded as text on demand
//!
//! ## Usage
//!
//! ```rust,ignore
//! use raffle_telemetry::{init_telemetry, TelemetryConfig};
//!
//! let config = TelemetryConfig::from_env()?;
//! init_telemetry(&config)?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `RAFFLE_LOG_LEVEL` | `info` | Log filter, falls back to `RUST_LOG` |
//! | `RAFFLE_JSON_LOGS` | `false` | JSON log lines |
//! | `RAFFLE_SERVICE_NAME` | `raffle-node` | Service name |
//! | `RAFFLE_NETWORK` | `hardhat` | Network name |

mod config;
mod logging;
pub mod metrics;

pub use config::TelemetryConfig;
pub use logging::init_logging;
pub use metrics::{
    encode_metrics, register_metrics, ENTRIES, ENTRIES_REJECTED, PAYOUT_FAILURES, POOL_BALANCE,
    ROUNDS_SETTLED, STALE_FULFILLMENTS, UPKEEPS,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Register metrics, then install logging.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    register_metrics()?;
    init_logging(config)
}

/// Convenience macro for recording a metric increment.
#[macro_export]
macro_rules! metric_inc {
    ($metric:expr) => {
        $metric.inc()
    };
    ($metric:expr, $labels:expr) => {
        $metric.with_label_values($labels).inc()
    };
}
