//! # Node Runtime
//!
//! Owns the deployment and the background tasks, and stops them together.

use crate::adapters::PrometheusRecorder;
use crate::config::NodeConfig;
use crate::deploy::{deploy_dev, DevDeployment};
use crate::wiring::{log_settlements, DemoPlayers, OracleRelay};
use anyhow::{Context, Result};
use parking_lot::Mutex;
use raffle_engine::UpkeepKeeper;
use shared_bus::{EventFilter, EventTopic};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// How long shutdown waits for each task.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

pub struct NodeRuntime {
    config: NodeConfig,
    deployment: DevDeployment,
    tasks: Mutex<Vec<(&'static str, JoinHandle<()>)>>,
    /// Shutdown signal sender.
    shutdown_tx: watch::Sender<bool>,
    /// Shutdown signal receiver.
    shutdown_rx: watch::Receiver<bool>,
}

impl NodeRuntime {
    pub fn new(config: NodeConfig) -> Result<Self> {
        info!(network = config.network.name, "Creating raffle node runtime");

        let deployment = deploy_dev(&config, Arc::new(PrometheusRecorder))
            .context("Failed to deploy raffle")?;
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        Ok(Self {
            config,
            deployment,
            tasks: Mutex::new(Vec::new()),
            shutdown_tx,
            shutdown_rx,
        })
    }

    pub fn deployment(&self) -> &DevDeployment {
        &self.deployment
    }

    /// Start the background tasks.
    ///
    /// 1. Settlement log
    /// 2. Oracle relay
    /// 3. Upkeep keeper
    /// 4. Demo players, if any
    pub fn start(&self) {
        let d = &self.deployment;

        info!("===========================================");
        info!("  Verifiable Raffle Node v{}", env!("CARGO_PKG_VERSION"));
        info!(
            "  Network: {} (chain {})",
            self.config.network.name, self.config.network.chain_id
        );
        info!("===========================================");

        self.spawn(
            "settlement-log",
            log_settlements(d.bus.event_stream(EventFilter::topics(vec![EventTopic::Settlement]))),
        );

        let relay = OracleRelay::new(
            d.coordinator.clone(),
            d.raffle.clone(),
            d.subscription_id,
            self.config.oracle_delay,
            self.config.vrf_fund_amount,
        );
        self.spawn(
            "oracle-relay",
            relay.run(d.bus.subscribe(EventFilter::topics(vec![EventTopic::Upkeep]))),
        );

        let keeper = UpkeepKeeper::new(d.raffle.clone(), self.config.keeper_poll);
        // The keeper watches the channel itself and exits cleanly.
        let handle = tokio::spawn(keeper.run(self.shutdown_rx.clone()));
        self.tasks.lock().push(("keeper", handle));

        if self.config.demo_players > 0 {
            let demo = DemoPlayers::new(d.raffle.clone(), self.config.demo_players);
            self.spawn(
                "demo-players",
                demo.run(d.bus.subscribe(EventFilter::topics(vec![EventTopic::Settlement]))),
            );
        }

        let relays = d.bus.listeners(EventTopic::Upkeep);
        if relays == 0 {
            warn!("No oracle relay attached, closed rounds will never settle");
        }
        info!(
            entrance_fee = %self.config.entrance_fee,
            interval_secs = self.config.interval_secs,
            demo_players = self.config.demo_players,
            upkeep_listeners = relays,
            settlement_listeners = d.bus.listeners(EventTopic::Settlement),
            "Raffle node running"
        );
    }

    /// Spawn `task`, cancelled when shutdown is signalled.
    fn spawn<F>(&self, name: &'static str, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut shutdown = self.shutdown_rx.clone();
        let handle = tokio::spawn(async move {
            tokio::select! {
                _ = task => {}
                _ = shutdown.changed() => {
                    info!(task = name, "Shutdown signal received");
                }
            }
        });
        self.tasks.lock().push((name, handle));
    }

    /// Signal shutdown and wait for every task to stop.
    pub async fn shutdown(&self) {
        info!("Initiating graceful shutdown...");

        if let Err(e) = self.shutdown_tx.send(true) {
            error!("Failed to send shutdown signal: {}", e);
        }

        let tasks: Vec<_> = self.tasks.lock().drain(..).collect();
        for (name, handle) in tasks {
            match tokio::time::timeout(SHUTDOWN_GRACE, handle).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!(task = name, error = %e, "Task ended abnormally"),
                Err(_) => warn!(task = name, "Task did not stop in time"),
            }
        }

        info!("Shutdown complete");
    }
}
