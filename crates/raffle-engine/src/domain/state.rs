//! The single shared state record every mutating operation runs against.

use super::ledger::EntryLedger;
use super::requests::RequestTable;
use super::round::{RoundClock, RoundStateMachine};
use shared_types::{Address, Timestamp};

/// Ledger, round state, outstanding request and clock.
///
/// `Clone` is the rollback mechanism: a mutating operation snapshots the
/// record before it starts and restores the snapshot if it fails midway.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RaffleState {
    pub ledger: EntryLedger,
    pub round: RoundStateMachine,
    pub requests: RequestTable,
    pub clock: RoundClock,
    pub recent_winner: Option<Address>,
}

impl RaffleState {
    #[must_use]
    pub fn new(created_at: Timestamp) -> Self {
        Self {
            ledger: EntryLedger::new(),
            round: RoundStateMachine::new(),
            requests: RequestTable::new(),
            clock: RoundClock::starting_at(created_at),
            recent_winner: None,
        }
    }
}
