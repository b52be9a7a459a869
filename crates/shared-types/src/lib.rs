//! # Shared Types Crate
//!
//! Primitive types shared by every crate in the raffle workspace.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: identities, identifiers and amounts used on
//!   the event bus and across ports are defined here, nowhere else.
//! - **Wei precision**: every amount is a `U256` count of wei. Ether strings
//!   are converted only at the edges (configuration, logs) with
//!   [`parse_ether`] and [`format_ether`].

pub mod entities;
pub mod units;

pub use entities::*;
pub use primitive_types::U256;
pub use units::{format_ether, parse_ether, UnitsError, WEI_PER_ETHER};
