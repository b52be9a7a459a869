//! Integration flows across the raffle crates.

pub mod choreography;
pub mod flows;
