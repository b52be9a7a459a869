//! # Upkeep Evaluator
//!
//! Pure predicate polled by the automation collaborator:
//!
//! `OPEN ∧ balance > 0 ∧ entrants > 0 ∧ now − last_settlement ≥ interval`

use super::ledger::EntryLedger;
use super::round::{RoundClock, RoundState};
use serde::{Deserialize, Serialize};
use shared_types::{Timestamp, U256};

/// Each conjunct of the upkeep predicate, kept separate for diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpkeepStatus {
    pub is_open: bool,
    pub has_balance: bool,
    pub has_players: bool,
    pub time_passed: bool,
    pub state: RoundState,
    pub balance: U256,
    pub entrants: usize,
    pub elapsed_secs: u64,
}

impl UpkeepStatus {
    #[must_use]
    pub fn needed(&self) -> bool {
        self.is_open && self.has_balance && self.has_players && self.time_passed
    }
}

#[derive(Clone, Copy, Debug)]
pub struct UpkeepEvaluator {
    interval_secs: u64,
}

impl UpkeepEvaluator {
    #[must_use]
    pub fn new(interval_secs: u64) -> Self {
        Self { interval_secs }
    }

    #[must_use]
    pub fn interval_secs(&self) -> u64 {
        self.interval_secs
    }

    #[must_use]
    pub fn evaluate(
        &self,
        state: RoundState,
        ledger: &EntryLedger,
        clock: &RoundClock,
        now: Timestamp,
    ) -> UpkeepStatus {
        let elapsed_secs = clock.elapsed(now);
        UpkeepStatus {
            is_open: state == RoundState::Open,
            has_balance: !ledger.balance().is_zero(),
            has_players: ledger.count() > 0,
            time_passed: elapsed_secs >= self.interval_secs,
            state,
            balance: ledger.balance(),
            entrants: ledger.count(),
            elapsed_secs,
        }
    }
}
