//! Adapters for the raffle ports.
//!
//! - `clock`: wall clock and manual clock
//! - `payout`: in-memory payout ledger
//! - `vrf_coordinator`: development randomness oracle
//! - `keeper`: automation loop driving upkeep

pub mod clock;
pub mod keeper;
pub mod payout;
pub mod vrf_coordinator;

pub use clock::{ManualClock, SystemClock};
pub use keeper::{KeeperOutcome, UpkeepKeeper, MIN_POLL_INTERVAL};
pub use payout::{InMemoryPayoutLedger, PayoutRecord};
pub use vrf_coordinator::{
    derive_words, FulfillmentReport, MockVrfCoordinator, SubscriptionInfo, DEFAULT_BASE_FEE,
    DEFAULT_GAS_PRICE_LINK,
};
