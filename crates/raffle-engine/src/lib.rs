//! # Raffle Engine
//!
//! Verifiable raffle core: players buy entries into a shared pool, an
//! automation collaborator closes the round once enough time has passed,
//! an external randomness oracle answers with a random word, and the whole
//! pool is paid to one entrant chosen by that word.
//!
//! ## Architecture
//!
//! This crate follows Hexagonal Architecture (Ports & Adapters):
//!
//! - **Domain Layer** (`domain/`): Pure raffle logic, no I/O
//!   - `EntryLedger`: Ordered entrants plus pooled balance
//!   - `RoundStateMachine`: OPEN / CALCULATING lifecycle
//!   - `UpkeepEvaluator`: Close predicate
//!   - `RequestTable`: The single outstanding randomness request
//!   - `SettlementEngine`: Winner selection and round reset
//!   - `RaffleConfig`, `RaffleConfigBuilder`: Fee, interval, oracle routing
//!
//! - **Ports Layer** (`ports/`): Trait definitions
//!   - `RaffleApi`: Driving port (entries, upkeep, fulfillment, views)
//!   - `RandomnessConsumer`: Oracle callback port
//!   - `RandomnessOracle`, `PayoutGateway`, `TimeSource`: Driven ports
//!
//! - **Service Layer** (`service.rs`): Orchestration
//!   - `RaffleService`: Implements `RaffleApi` and `RandomnessConsumer`
//!
//! - **Adapters Layer** (`adapters/`)
//!   - `MockVrfCoordinator`: Subscription-billed development oracle
//!   - `InMemoryPayoutLedger`: Winner balances
//!   - `SystemClock`, `ManualClock`: Time sources
//!   - `UpkeepKeeper`: Polling automation loop
//!
//! ## Invariants
//!
//! - At most one randomness request is outstanding, and only while CALCULATING
//! - An empty ledger holds no balance
//! - A fulfillment is accepted only for the outstanding request id
//! - Settlement pays the whole pool, clears the ledger and reopens the round
//!   in one step; a failed payout leaves the round exactly as it was
//!
//! ## Usage Example
//!
//! ```ignore
//! use raffle_engine::{
//!     InMemoryPayoutLedger, MockVrfCoordinator, RaffleApi, RaffleConfig, RaffleService,
//!     SystemClock,
//! };
//! use shared_types::parse_ether;
//! use std::sync::Arc;
//!
//! let coordinator = Arc::new(MockVrfCoordinator::default());
//! let sub = coordinator.create_subscription();
//!
//! let config = RaffleConfig::builder()
//!     .entrance_fee(parse_ether("0.01")?)
//!     .interval_secs(20)
//!     .subscription_id(sub)
//!     .callback_gas_limit(500_000)
//!     .build()?;
//!
//! let raffle = RaffleService::new(
//!     config,
//!     coordinator.clone(),
//!     Arc::new(InMemoryPayoutLedger::new()),
//!     Arc::new(SystemClock),
//! )?;
//!
//! raffle.enter(player, parse_ether("0.01")?).await?;
//! if raffle.check_upkeep().await {
//!     let request_id = raffle.perform_upkeep().await?;
//!     coordinator.fulfill_random_words(request_id, &raffle).await?;
//! }
//! ```

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod adapters;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod service;

// Re-exports for convenience
pub use adapters::{
    derive_words, FulfillmentReport, InMemoryPayoutLedger, KeeperOutcome, ManualClock,
    MockVrfCoordinator, PayoutRecord, SubscriptionInfo, SystemClock, UpkeepKeeper,
};
pub use domain::{
    select_winner, violated_invariants, EntryLedger, EntryReceipt, OracleRouting, PendingRequest,
    RaffleConfig, RaffleConfigBuilder, RaffleState, RequestTable, RoundClock, RoundState,
    RoundStateMachine, Settlement, SettlementEngine, UpkeepEvaluator, UpkeepStatus,
};
pub use error::{
    ConfigError, ErrorKind, FatalSettlementError, OracleError, PayoutError, PreconditionError,
    RaffleError, RaffleResult, ValidationError,
};
pub use metrics::{Metrics, MetricsRecorder, MetricsSnapshot, NoOpMetrics};
pub use ports::{PayoutGateway, RaffleApi, RandomnessConsumer, RandomnessOracle, RandomnessRequest, TimeSource};
pub use service::RaffleService;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
