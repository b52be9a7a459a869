//! Driven Ports (SPI - Outbound)
//!
//! What the raffle needs from the outside world: a randomness oracle, a
//! way to move funds, and a clock.

use crate::domain::OracleRouting;
use crate::error::{OracleError, PayoutError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared_types::{Address, RequestId, SubscriptionId, Timestamp, U256};

/// Randomness request as forwarded to the oracle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RandomnessRequest {
    pub key_hash: [u8; 32],
    pub subscription_id: SubscriptionId,
    pub request_confirmations: u16,
    pub callback_gas_limit: u32,
    pub num_words: u32,
}

impl From<&OracleRouting> for RandomnessRequest {
    fn from(routing: &OracleRouting) -> Self {
        Self {
            key_hash: routing.key_hash,
            subscription_id: routing.subscription_id,
            request_confirmations: routing.request_confirmations,
            callback_gas_limit: routing.callback_gas_limit,
            num_words: routing.num_words,
        }
    }
}

/// External randomness oracle.
///
/// `request_randomness` returns as soon as the request is accepted; the
/// random words arrive later through
/// [`RandomnessConsumer`](crate::ports::inbound::RandomnessConsumer).
#[async_trait]
pub trait RandomnessOracle: Send + Sync {
    async fn request_randomness(&self, request: RandomnessRequest)
        -> Result<RequestId, OracleError>;
}

/// Moves the pool to the winner.
///
/// Implementations must not call back into the raffle: the raffle holds its
/// state lock across the transfer.
#[async_trait]
pub trait PayoutGateway: Send + Sync {
    async fn transfer(&self, to: Address, amount: U256) -> Result<(), PayoutError>;
}

/// Source of "now", in seconds since the Unix epoch.
pub trait TimeSource: Send + Sync {
    fn now(&self) -> Timestamp;
}
