//! # Settlement Engine
//!
//! Picks the winner as `random_value mod entrant_count` and commits every
//! state effect of closing the round:
//!
//! 1. resolve the outstanding request
//! 2. clear the ledger (entrants emptied, pool zeroed)
//! 3. advance the round clock to `now`
//! 4. reopen the round
//!
//! The caller performs the outbound transfer only after these effects are
//! in place, and restores its snapshot if the transfer fails.

use super::requests::PendingRequest;
use super::state::RaffleState;
use crate::error::PreconditionError;
use serde::{Deserialize, Serialize};
use shared_types::{Address, RequestId, RoundId, Timestamp, U256};

/// A committed settlement awaiting (or having completed) its payout.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub round: RoundId,
    pub request_id: RequestId,
    pub random_value: U256,
    pub winner_index: usize,
    pub winner: Address,
    pub amount: U256,
    pub settled_at: Timestamp,
    /// Round that opened as a result
    pub next_round: RoundId,
}

/// Index and identity of the winner among `entrants`.
#[must_use]
pub fn select_winner(random_value: U256, entrants: &[Address]) -> Option<(usize, Address)> {
    if entrants.is_empty() {
        return None;
    }
    let index = (random_value % U256::from(entrants.len())).as_usize();
    entrants.get(index).map(|winner| (index, *winner))
}

pub struct SettlementEngine;

impl SettlementEngine {
    /// Apply the settlement effects for `request_id` to `state`.
    ///
    /// On error `state` is untouched.
    pub fn settle(
        state: &mut RaffleState,
        request_id: RequestId,
        random_value: U256,
        now: Timestamp,
    ) -> Result<Settlement, PreconditionError> {
        let PendingRequest { round, .. } = *state.requests.matching(request_id)?;

        if state.round.is_open() {
            return Err(PreconditionError::RoundNotCalculating {
                state: state.round.state(),
            });
        }
        let (winner_index, winner) = select_winner(random_value, state.ledger.entrants())
            .ok_or(PreconditionError::EmptyRound { round })?;

        state.requests.resolve(request_id)?;
        let amount = state.ledger.clear();
        let settled_at = state.clock.advance_to(now);
        let next_round = state.round.reopen()?;
        state.recent_winner = Some(winner);

        Ok(Settlement {
            round,
            request_id,
            random_value,
            winner_index,
            winner,
            amount,
            settled_at,
            next_round,
        })
    }
}
