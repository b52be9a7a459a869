//! Upkeep keeper
//!
//! Automation collaborator: polls `check_upkeep` and calls
//! `perform_upkeep` when it turns true. Rejections are logged and left
//! for the next tick.

use crate::error::RaffleError;
use crate::ports::RaffleApi;
use shared_types::RequestId;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// What a single tick did.
#[derive(Debug)]
pub enum KeeperOutcome {
    /// Predicate false, nothing to do
    Idle,
    /// Round closed and randomness requested
    Performed(RequestId),
    /// Predicate was true but `perform_upkeep` was rejected
    Rejected(RaffleError),
}

/// Shortest poll interval; a zero period is not a valid tokio interval.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

pub struct UpkeepKeeper<A: RaffleApi + ?Sized> {
    raffle: Arc<A>,
    poll_interval: Duration,
}

impl<A: RaffleApi + ?Sized> UpkeepKeeper<A> {
    /// `poll_interval` is clamped to at least [`MIN_POLL_INTERVAL`].
    pub fn new(raffle: Arc<A>, poll_interval: Duration) -> Self {
        Self {
            raffle,
            poll_interval: poll_interval.max(MIN_POLL_INTERVAL),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub async fn tick(&self) -> KeeperOutcome {
        if !self.raffle.check_upkeep().await {
            return KeeperOutcome::Idle;
        }

        match self.raffle.perform_upkeep().await {
            Ok(request_id) => {
                info!(request_id = %request_id, "Keeper performed upkeep");
                KeeperOutcome::Performed(request_id)
            }
            Err(err) => {
                // Lost a race with another caller, or the oracle refused.
                warn!(error = %err, "Keeper upkeep rejected");
                KeeperOutcome::Rejected(err)
            }
        }
    }

    /// Tick every `poll_interval` until `shutdown` flips to true.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let poll_ms = u64::try_from(self.poll_interval.as_millis()).unwrap_or(u64::MAX);
        info!(poll_ms, "Upkeep keeper started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let KeeperOutcome::Idle = self.tick().await {
                        debug!("Upkeep not needed");
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("Upkeep keeper stopping");
                        break;
                    }
                }
            }
        }
    }
}
