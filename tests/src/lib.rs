//! # Verifiable Raffle Test Suite
//!
//! Cross-crate integration tests.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── flows.rs          # Raffle + coordinator + payout ledger
//!     └── choreography.rs   # Keeper, oracle relay and observers over the bus
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p raffle-tests
//! cargo test -p raffle-tests integration::choreography::
//! ```

pub mod integration;
