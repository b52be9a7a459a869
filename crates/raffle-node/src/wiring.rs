//! # Event Wiring
//!
//! Background tasks that react to raffle events on the bus:
//!
//! ```text
//! UpkeepKeeper ──perform_upkeep──→ Raffle ──UpkeepPerformed──→ OracleRelay
//!                                    ↑                             │
//!                                    └──fulfill_random_words───────┘
//!                                    │
//!                                    └──WinnerSettled──→ DemoPlayers, settlement log
//! ```

use crate::deploy::NodeRaffle;
use raffle_engine::{ErrorKind, MockVrfCoordinator, OracleError, RaffleApi};
use raffle_telemetry::{log_request_event, log_round_event};
use rand::Rng;
use shared_bus::{EventStream, RaffleEvent, Subscription};
use shared_types::{format_ether, Address, RequestId, SubscriptionId, U256};
use std::sync::Arc;
use std::time::Duration;
use tokio_stream::StreamExt;
use uuid::Uuid;

/// Fulfils each randomness request through the mock coordinator after a
/// fixed delay, standing in for the off-chain oracle network.
///
/// An underfunded subscription is topped up once and the delivery retried.
/// Development only: a live oracle never funds its own subscription.
pub struct OracleRelay {
    coordinator: Arc<MockVrfCoordinator>,
    raffle: Arc<NodeRaffle>,
    subscription_id: SubscriptionId,
    delay: Duration,
    top_up: U256,
}

impl OracleRelay {
    pub fn new(
        coordinator: Arc<MockVrfCoordinator>,
        raffle: Arc<NodeRaffle>,
        subscription_id: SubscriptionId,
        delay: Duration,
        top_up: U256,
    ) -> Self {
        Self {
            coordinator,
            raffle,
            subscription_id,
            delay,
            top_up,
        }
    }

    /// Relay every `UpkeepPerformed` on `events` until the bus closes.
    pub async fn run(self, mut events: Subscription) {
        while let Some(event) = events.recv().await {
            if let RaffleEvent::UpkeepPerformed { round, request_id } = event {
                tokio::time::sleep(self.delay).await;
                if let Err(err) = self.relay(request_id).await {
                    log_round_event!(error, "oracle", "Relay failed", round, error = %err);
                }
            }
        }
    }

    /// Deliver random words for one request.
    pub async fn relay(&self, request_id: RequestId) -> Result<(), OracleError> {
        let correlation_id = Uuid::new_v4();
        log_request_event!(debug, "oracle", "Relaying request", request_id, correlation_id = %correlation_id);

        let report = match self
            .coordinator
            .fulfill_random_words(request_id, self.raffle.as_ref())
            .await
        {
            Err(OracleError::InsufficientBalance { required, .. }) => {
                let amount = self.top_up.max(required);
                let balance = self.coordinator.fund_subscription(self.subscription_id, amount)?;
                log_request_event!(
                    warn,
                    "oracle",
                    "Subscription underfunded, topped up",
                    request_id,
                    correlation_id = %correlation_id,
                    balance = %balance
                );
                self.coordinator
                    .fulfill_random_words(request_id, self.raffle.as_ref())
                    .await?
            }
            other => other?,
        };

        match &report.outcome {
            Ok(settlement) => log_request_event!(
                info,
                "oracle",
                "Request fulfilled",
                request_id,
                correlation_id = %correlation_id,
                winner = %settlement.winner,
                payment = %report.payment
            ),
            Err(err) if err.kind() == ErrorKind::FatalSettlement => log_request_event!(
                error,
                "oracle",
                "Settlement failed, request left pending",
                request_id,
                correlation_id = %correlation_id,
                error = %err
            ),
            Err(err) => log_request_event!(
                warn,
                "oracle",
                "Fulfillment rejected",
                request_id,
                correlation_id = %correlation_id,
                error = %err
            ),
        }
        Ok(())
    }
}

/// Fixed set of players who enter every round, so the dev node has
/// something to settle.
pub struct DemoPlayers {
    raffle: Arc<NodeRaffle>,
    players: Vec<Address>,
}

impl DemoPlayers {
    /// `count` players with random addresses.
    pub fn new(raffle: Arc<NodeRaffle>, count: usize) -> Self {
        let mut rng = rand::thread_rng();
        let players = (0..count)
            .map(|_| {
                let mut bytes = [0u8; 20];
                rng.fill(&mut bytes);
                Address::from(bytes)
            })
            .collect();
        Self { raffle, players }
    }

    pub fn players(&self) -> &[Address] {
        &self.players
    }

    /// Every player enters the current round at the entrance fee.
    pub async fn enter_round(&self) -> usize {
        let fee = self.raffle.entrance_fee();
        let mut entered = 0;
        for player in &self.players {
            if self.raffle.enter(*player, fee).await.is_ok() {
                entered += 1;
            }
        }
        entered
    }

    /// Enter now, then again after every settlement.
    pub async fn run(self, mut settlements: Subscription) {
        self.enter_round().await;
        while let Some(event) = settlements.recv().await {
            if let RaffleEvent::WinnerSettled { .. } = event {
                self.enter_round().await;
            }
        }
    }
}

/// Log each settled round.
pub async fn log_settlements(mut events: EventStream) {
    while let Some(event) = events.next().await {
        if let RaffleEvent::WinnerSettled {
            round,
            winner,
            amount,
            ..
        } = event
        {
            log_round_event!(
                info,
                "settlement",
                "Round settled",
                round,
                winner = %winner,
                prize_eth = %format_ether(amount)
            );
        }
    }
}
