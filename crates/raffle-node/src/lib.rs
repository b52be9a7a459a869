//! # Raffle Node
//!
//! Development node for the verifiable raffle.
//!
//! ## Modular Structure
//!
//! - `networks` - Per-network deployment parameters
//! - `config` - Node configuration from environment
//! - `deploy` - Mock coordinator, funded subscription, raffle
//! - `adapters` - Prometheus bridge for engine metrics
//! - `wiring` - Oracle relay, demo players, settlement log
//! - `runtime` - Task lifecycle and graceful shutdown
//!
//! ## Startup Sequence
//!
//! 1. Initialize telemetry
//! 2. Load configuration
//! 3. Deploy on the selected development network
//! 4. Spawn keeper, relay and demo tasks
//! 5. Run until Ctrl+C, then shut down and dump metrics

pub mod adapters;
pub mod config;
pub mod deploy;
pub mod networks;
pub mod runtime;
pub mod wiring;

pub use adapters::PrometheusRecorder;
pub use config::{NodeConfig, NodeConfigError};
pub use deploy::{deploy_dev, DeployError, DevDeployment, NodeRaffle};
pub use networks::{NetworkKind, NetworkParams, NETWORKS};
pub use runtime::NodeRuntime;
pub use wiring::{log_settlements, DemoPlayers, OracleRelay};
