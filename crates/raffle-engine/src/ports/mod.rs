//! Ports layer - hexagonal architecture boundaries

pub mod inbound;
pub mod outbound;

pub use inbound::{RaffleApi, RandomnessConsumer};
pub use outbound::{PayoutGateway, RandomnessOracle, RandomnessRequest, TimeSource};
