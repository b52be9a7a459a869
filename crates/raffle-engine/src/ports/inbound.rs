//! Driving Ports (API - Inbound)
//!
//! `RaffleApi` is what players and the automation keeper call.
//! `RandomnessConsumer` is the callback the randomness oracle invokes.

use crate::domain::{EntryReceipt, RoundState, Settlement, UpkeepStatus};
use crate::error::RaffleResult;
use async_trait::async_trait;
use shared_types::{Address, RequestId, RoundId, Timestamp, U256};

/// Primary raffle API.
#[async_trait]
pub trait RaffleApi: Send + Sync {
    /// Pay `amount` into the current round.
    ///
    /// Fails with `InsufficientFee` below the entrance fee and `RoundNotOpen`
    /// while the round is calculating.
    async fn enter(&self, payer: Address, amount: U256) -> RaffleResult<EntryReceipt>;

    /// Side-effect-free upkeep predicate.
    async fn check_upkeep(&self) -> bool;

    /// The predicate's individual conditions.
    async fn upkeep_status(&self) -> UpkeepStatus;

    /// Close the round and request randomness.
    ///
    /// Fails with `UpkeepNotNeeded` when `check_upkeep` would return false.
    async fn perform_upkeep(&self) -> RaffleResult<RequestId>;

    /// Settle the round with `random_value` if `request_id` is outstanding.
    async fn fulfill(&self, request_id: RequestId, random_value: U256) -> RaffleResult<Settlement>;

    fn entrance_fee(&self) -> U256;

    fn interval(&self) -> u64;

    async fn round_state(&self) -> RoundState;

    async fn round_id(&self) -> RoundId;

    async fn entrant_count(&self) -> usize;

    async fn entrant_at(&self, index: usize) -> Option<Address>;

    async fn balance(&self) -> U256;

    async fn last_settlement_timestamp(&self) -> Timestamp;

    async fn recent_winner(&self) -> Option<Address>;

    async fn outstanding_request(&self) -> Option<RequestId>;
}

/// Fulfillment callback invoked by the randomness oracle.
#[async_trait]
pub trait RandomnessConsumer: Send + Sync {
    /// Settle with the first of `words`.
    async fn fulfill_random_words(
        &self,
        request_id: RequestId,
        words: Vec<U256>,
    ) -> RaffleResult<Settlement>;
}
