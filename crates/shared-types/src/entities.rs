//! # Core Entities
//!
//! Identities and identifiers that cross crate boundaries.

use primitive_types::U256;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Seconds since the Unix epoch.
pub type Timestamp = u64;

/// Sequential round number. The first round of a raffle is 1.
pub type RoundId = u64;

/// Billing account at the randomness oracle.
pub type SubscriptionId = u64;

/// A 20-byte payable identity.
///
/// Entrants, winners and payout recipients are all addresses. The raffle
/// attaches no meaning to the bytes beyond equality.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// The all-zero address.
    pub const ZERO: Address = Address([0u8; 20]);

    /// Address with every byte set to `byte`. Handy for fixtures and demos.
    #[must_use]
    pub const fn repeat_byte(byte: u8) -> Self {
        Self([byte; 20])
    }

    /// Raw bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

/// Error parsing an [`Address`] from text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AddressParseError {
    /// Missing `0x` prefix.
    #[error("address must start with 0x")]
    MissingPrefix,

    /// Body is not 40 hex characters.
    #[error("address must be 40 hex characters, got {0}")]
    InvalidLength(usize),

    /// Body contains a non-hex character.
    #[error("invalid hex in address: {0}")]
    InvalidHex(String),
}

impl FromStr for Address {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let body = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .ok_or(AddressParseError::MissingPrefix)?;
        if body.len() != 40 {
            return Err(AddressParseError::InvalidLength(body.len()));
        }

        let mut bytes = [0u8; 20];
        hex::decode_to_slice(body, &mut bytes)
            .map_err(|e| AddressParseError::InvalidHex(e.to_string()))?;
        Ok(Self(bytes))
    }
}

/// Identifier issued by the randomness oracle for a single request.
///
/// Opaque to the raffle; only compared for equality when a fulfillment
/// arrives.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(pub U256);

impl From<u64> for RequestId {
    fn from(id: u64) -> Self {
        Self(U256::from(id))
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
