//! # Development Deployment
//!
//! Stands up a raffle on a development network:
//!
//! 1. Create the mock coordinator (base fee 0.25 LINK, 1e9 LINK per gas)
//! 2. Create a subscription and fund it
//! 3. Construct the raffle with the network's parameters

use crate::config::{NodeConfig, NodeConfigError};
use raffle_engine::{
    InMemoryPayoutLedger, MetricsRecorder, MockVrfCoordinator, OracleError, RaffleError,
    RaffleService, SystemClock,
};
use shared_bus::InMemoryEventBus;
use shared_types::SubscriptionId;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Raffle wired to the development adapters.
pub type NodeRaffle = RaffleService<MockVrfCoordinator, InMemoryPayoutLedger, SystemClock>;

#[derive(Debug, Error)]
pub enum DeployError {
    #[error("network {0} needs a live coordinator adapter, none is bundled")]
    LiveNetwork(&'static str),

    #[error(transparent)]
    Config(#[from] NodeConfigError),

    #[error("subscription setup failed: {0}")]
    Subscription(#[from] OracleError),

    #[error("raffle construction failed: {0}")]
    Raffle(#[from] RaffleError),
}

/// Everything a development deployment creates.
pub struct DevDeployment {
    pub coordinator: Arc<MockVrfCoordinator>,
    pub payouts: Arc<InMemoryPayoutLedger>,
    pub bus: Arc<InMemoryEventBus>,
    pub subscription_id: SubscriptionId,
    pub raffle: Arc<NodeRaffle>,
}

pub fn deploy_dev(
    config: &NodeConfig,
    metrics: Arc<dyn MetricsRecorder>,
) -> Result<DevDeployment, DeployError> {
    if !config.network.is_development() {
        return Err(DeployError::LiveNetwork(config.network.name));
    }

    let coordinator = Arc::new(MockVrfCoordinator::default());
    let subscription_id = coordinator.create_subscription();
    coordinator.fund_subscription(subscription_id, config.vrf_fund_amount)?;
    info!(
        network = config.network.name,
        chain_id = config.network.chain_id,
        subscription_id,
        funded = %config.vrf_fund_amount,
        "Mock coordinator deployed"
    );

    let bus = Arc::new(InMemoryEventBus::new());
    let payouts = Arc::new(InMemoryPayoutLedger::new());
    let raffle = RaffleService::new(
        config.raffle_config(subscription_id)?,
        coordinator.clone(),
        payouts.clone(),
        Arc::new(SystemClock),
    )?
    .with_event_publisher(bus.clone())
    .with_metrics(metrics);

    Ok(DevDeployment {
        coordinator,
        payouts,
        bus,
        subscription_id,
        raffle: Arc::new(raffle),
    })
}
