//! Raffle Service - core orchestration
//!
//! Owns the single state record (ledger, round state, outstanding request,
//! clock) behind one async mutex. Every operation holds the lock from its
//! first read to its last write, including the awaits on the oracle and the
//! payout gateway, so operations never interleave.
//!
//! Operations that await a port stage their mutations on a working copy of
//! the record and write it back only once the port call has succeeded. A
//! failed call, or a caller that drops the future mid-await, leaves the
//! record exactly as it was. Events are published only after an operation
//! succeeds.

use crate::domain::{
    violated_invariants, EntryReceipt, RaffleConfig, RaffleState, RoundState, Settlement,
    SettlementEngine, UpkeepEvaluator, UpkeepStatus,
};
use crate::error::{
    FatalSettlementError, PreconditionError, RaffleError, RaffleResult, ValidationError,
};
use crate::metrics::{MetricsRecorder, NoOpMetrics};
use crate::ports::inbound::{RaffleApi, RandomnessConsumer};
use crate::ports::outbound::{PayoutGateway, RandomnessOracle, RandomnessRequest, TimeSource};
use async_trait::async_trait;
use shared_bus::{EventPublisher, InMemoryEventBus, RaffleEvent};
use shared_types::{Address, RequestId, RoundId, Timestamp, U256};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

pub struct RaffleService<O, P, C>
where
    O: RandomnessOracle,
    P: PayoutGateway,
    C: TimeSource,
{
    config: RaffleConfig,
    evaluator: UpkeepEvaluator,
    state: Arc<Mutex<RaffleState>>,
    oracle: Arc<O>,
    payout: Arc<P>,
    clock: Arc<C>,
    events: Arc<dyn EventPublisher>,
    metrics: Arc<dyn MetricsRecorder>,
}

impl<O, P, C> RaffleService<O, P, C>
where
    O: RandomnessOracle,
    P: PayoutGateway,
    C: TimeSource,
{
    /// Create the raffle. The round clock starts at `clock.now()`.
    pub fn new(
        config: RaffleConfig,
        oracle: Arc<O>,
        payout: Arc<P>,
        clock: Arc<C>,
    ) -> RaffleResult<Self> {
        config.validate()?;
        let created_at = clock.now();

        info!(
            entrance_fee = %config.entrance_fee,
            interval_secs = config.interval_secs,
            subscription_id = config.routing.subscription_id,
            created_at,
            "Raffle created"
        );

        Ok(Self {
            evaluator: UpkeepEvaluator::new(config.interval_secs),
            config,
            state: Arc::new(Mutex::new(RaffleState::new(created_at))),
            oracle,
            payout,
            clock,
            events: Arc::new(InMemoryEventBus::new()),
            metrics: Arc::new(NoOpMetrics),
        })
    }

    /// Publish lifecycle events to `events`.
    pub fn with_event_publisher(mut self, events: Arc<dyn EventPublisher>) -> Self {
        self.events = events;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<dyn MetricsRecorder>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn config(&self) -> &RaffleConfig {
        &self.config
    }

    /// Copy of the whole state record.
    pub async fn snapshot(&self) -> RaffleState {
        self.state.lock().await.clone()
    }

    fn try_enter(
        &self,
        state: &mut RaffleState,
        payer: Address,
        amount: U256,
    ) -> RaffleResult<EntryReceipt> {
        if amount < self.config.entrance_fee {
            return Err(ValidationError::InsufficientFee {
                sent: amount,
                required: self.config.entrance_fee,
            }
            .into());
        }
        state.round.ensure_open()?;
        let entrant_count = state.ledger.record_entry(payer, amount)?;

        Ok(EntryReceipt {
            round: state.round.round_id(),
            entrant: payer,
            amount,
            entrant_count,
            pool: state.ledger.balance(),
        })
    }

    fn upkeep_rejected(&self, err: RaffleError) -> RaffleError {
        self.metrics.record_upkeep_rejected(err.reason());
        warn!(error = %err, "Upkeep rejected");
        err
    }
}

fn check_invariants(state: &RaffleState) {
    let violations = violated_invariants(state);
    debug_assert!(violations.is_empty(), "raffle invariants violated: {violations:?}");
}

#[async_trait]
impl<O, P, C> RaffleApi for RaffleService<O, P, C>
where
    O: RandomnessOracle,
    P: PayoutGateway,
    C: TimeSource,
{
    async fn enter(&self, payer: Address, amount: U256) -> RaffleResult<EntryReceipt> {
        let mut state = self.state.lock().await;

        let receipt = match self.try_enter(&mut state, payer, amount) {
            Ok(receipt) => receipt,
            Err(err) => {
                self.metrics.record_entry_rejected(err.reason());
                warn!(entrant = %payer, amount = %amount, error = %err, "Entry rejected");
                return Err(err);
            }
        };
        check_invariants(&state);

        self.metrics.record_entry(amount, receipt.pool);
        info!(
            round = receipt.round,
            entrant = %payer,
            amount = %amount,
            entrant_count = receipt.entrant_count,
            "Entrant joined"
        );
        self.events
            .publish(RaffleEvent::EntrantJoined {
                round: receipt.round,
                entrant: payer,
                amount,
                entrant_count: receipt.entrant_count,
            })
            .await;

        Ok(receipt)
    }

    async fn check_upkeep(&self) -> bool {
        let status = self.upkeep_status().await;
        debug!(
            needed = status.needed(),
            state = %status.state,
            entrants = status.entrants,
            elapsed_secs = status.elapsed_secs,
            "Upkeep checked"
        );
        status.needed()
    }

    async fn upkeep_status(&self) -> UpkeepStatus {
        let state = self.state.lock().await;
        self.evaluator.evaluate(
            state.round.state(),
            &state.ledger,
            &state.clock,
            self.clock.now(),
        )
    }

    async fn perform_upkeep(&self) -> RaffleResult<RequestId> {
        let mut state = self.state.lock().await;
        let now = self.clock.now();

        let status = self
            .evaluator
            .evaluate(state.round.state(), &state.ledger, &state.clock, now);
        if !status.needed() {
            return Err(self.upkeep_rejected(
                PreconditionError::UpkeepNotNeeded {
                    balance: status.balance,
                    entrants: status.entrants,
                    state: status.state,
                    elapsed_secs: status.elapsed_secs,
                }
                .into(),
            ));
        }

        let mut next = state.clone();
        let round = next.round.round_id();
        next.round.close()?;

        let request = RandomnessRequest::from(&self.config.routing);
        let request_id = self
            .oracle
            .request_randomness(request)
            .await
            .map_err(|err| self.upkeep_rejected(err.into()))?;
        next.requests
            .insert(request_id, round, now)
            .map_err(|err| self.upkeep_rejected(err.into()))?;
        check_invariants(&next);
        *state = next;

        self.metrics.record_upkeep_performed();
        info!(
            round,
            request_id = %request_id,
            entrants = status.entrants,
            pool = %status.balance,
            "Round closed, randomness requested"
        );
        self.events
            .publish(RaffleEvent::UpkeepPerformed { round, request_id })
            .await;

        Ok(request_id)
    }

    async fn fulfill(&self, request_id: RequestId, random_value: U256) -> RaffleResult<Settlement> {
        let mut state = self.state.lock().await;
        let mut next = state.clone();
        let now = self.clock.now();

        let settlement = match SettlementEngine::settle(&mut next, request_id, random_value, now) {
            Ok(settlement) => settlement,
            Err(err) => {
                let err = RaffleError::from(err);
                if err.is_stale_delivery() {
                    self.metrics.record_stale_fulfillment();
                }
                warn!(request_id = %request_id, error = %err, "Fulfillment rejected");
                return Err(err);
            }
        };

        // The record is untouched until the transfer has gone through.
        if let Err(source) = self
            .payout
            .transfer(settlement.winner, settlement.amount)
            .await
        {
            self.metrics.record_payout_failure();
            error!(
                round = settlement.round,
                request_id = %request_id,
                winner = %settlement.winner,
                amount = %settlement.amount,
                error = %source,
                "Payout failed, settlement rolled back"
            );
            return Err(FatalSettlementError::PayoutFailed {
                round: settlement.round,
                request_id,
                winner: settlement.winner,
                amount: settlement.amount,
                source,
            }
            .into());
        }
        check_invariants(&next);
        *state = next;

        self.metrics.record_settlement(settlement.amount);
        info!(
            round = settlement.round,
            request_id = %request_id,
            winner = %settlement.winner,
            winner_index = settlement.winner_index,
            amount = %settlement.amount,
            "Winner settled"
        );
        self.events
            .publish(RaffleEvent::WinnerSettled {
                round: settlement.round,
                request_id,
                winner: settlement.winner,
                amount: settlement.amount,
                settled_at: settlement.settled_at,
            })
            .await;

        Ok(settlement)
    }

    fn entrance_fee(&self) -> U256 {
        self.config.entrance_fee
    }

    fn interval(&self) -> u64 {
        self.config.interval_secs
    }

    async fn round_state(&self) -> RoundState {
        self.state.lock().await.round.state()
    }

    async fn round_id(&self) -> RoundId {
        self.state.lock().await.round.round_id()
    }

    async fn entrant_count(&self) -> usize {
        self.state.lock().await.ledger.count()
    }

    async fn entrant_at(&self, index: usize) -> Option<Address> {
        self.state.lock().await.ledger.entrant_at(index)
    }

    async fn balance(&self) -> U256 {
        self.state.lock().await.ledger.balance()
    }

    async fn last_settlement_timestamp(&self) -> Timestamp {
        self.state.lock().await.clock.last_settlement()
    }

    async fn recent_winner(&self) -> Option<Address> {
        self.state.lock().await.recent_winner
    }

    async fn outstanding_request(&self) -> Option<RequestId> {
        self.state.lock().await.requests.outstanding()
    }
}

#[async_trait]
impl<O, P, C> RandomnessConsumer for RaffleService<O, P, C>
where
    O: RandomnessOracle,
    P: PayoutGateway,
    C: TimeSource,
{
    async fn fulfill_random_words(
        &self,
        request_id: RequestId,
        words: Vec<U256>,
    ) -> RaffleResult<Settlement> {
        let Some(random_value) = words.first().copied() else {
            warn!(request_id = %request_id, "Fulfillment carried no random words");
            return Err(PreconditionError::NoRandomWords { request_id }.into());
        };
        self.fulfill(request_id, random_value).await
    }
}
