//! # Domain Layer
//!
//! Pure raffle logic. No I/O, no async, no locks.

pub mod config;
pub mod invariants;
pub mod ledger;
pub mod requests;
pub mod round;
pub mod settlement;
pub mod state;
pub mod upkeep;

pub use config::{
    OracleRouting, RaffleConfig, RaffleConfigBuilder, DEFAULT_NUM_WORDS,
    DEFAULT_REQUEST_CONFIRMATIONS, MAX_NUM_WORDS, MAX_REQUEST_CONFIRMATIONS,
};
pub use invariants::violated_invariants;
pub use ledger::EntryLedger;
pub use requests::{PendingRequest, RequestTable};
pub use round::{RoundClock, RoundState, RoundStateMachine};
pub use settlement::{select_winner, Settlement, SettlementEngine};
pub use state::RaffleState;
pub use upkeep::{UpkeepEvaluator, UpkeepStatus};

use serde::{Deserialize, Serialize};
use shared_types::{Address, RoundId, U256};

/// Result of a successful `enter`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryReceipt {
    pub round: RoundId,
    pub entrant: Address,
    pub amount: U256,
    pub entrant_count: usize,
    /// Pool after the entry
    pub pool: U256,
}
