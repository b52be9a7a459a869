//! Error types for the raffle core
//!
//! Every rejected call leaves the ledger, balance, round state and
//! outstanding request exactly as they were before the call.

use crate::domain::RoundState;
use shared_types::{Address, RequestId, RoundId, SubscriptionId, U256};
use thiserror::Error;

/// Input or lifecycle rejections on `enter`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Amount below the entrance fee
    #[error("Insufficient fee: sent {sent}, required {required}")]
    InsufficientFee { sent: U256, required: U256 },

    /// Entries are closed while the round is being calculated
    #[error("Round not open: state is {state}")]
    RoundNotOpen { state: RoundState },

    /// Pool would exceed 256 bits
    #[error("Pool balance overflow")]
    PoolOverflow,
}

/// Preconditions that gate upkeep and fulfillment.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PreconditionError {
    /// Upkeep predicate is false
    #[error(
        "Upkeep not needed: balance {balance}, entrants {entrants}, state {state}, elapsed {elapsed_secs}s"
    )]
    UpkeepNotNeeded {
        balance: U256,
        entrants: usize,
        state: RoundState,
        elapsed_secs: u64,
    },

    /// Fulfillment for a request that is not outstanding (stale or duplicate)
    #[error("Unknown request {request_id} (outstanding: {outstanding:?})")]
    UnknownRequest {
        request_id: RequestId,
        outstanding: Option<RequestId>,
    },

    /// Oracle delivered an empty word list
    #[error("No random words delivered for request {request_id}")]
    NoRandomWords { request_id: RequestId },

    /// A request is already outstanding for this round
    #[error("Request {request_id} already outstanding")]
    RequestAlreadyOutstanding { request_id: RequestId },

    /// Settlement attempted outside CALCULATING
    #[error("Round not calculating: state is {state}")]
    RoundNotCalculating { state: RoundState },

    /// Settlement attempted with no entrants
    #[error("Round {round} has no entrants")]
    EmptyRound { round: RoundId },
}

/// Outbound transfer failure reported by a payout gateway.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PayoutError {
    /// Recipient refused the transfer
    #[error("Transfer to {recipient} rejected: {reason}")]
    Rejected { recipient: Address, reason: String },

    /// Gateway could not be reached
    #[error("Payout gateway unavailable: {0}")]
    Unavailable(String),
}

/// Failure after a winner has been selected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FatalSettlementError {
    /// The payout transfer failed; the settlement was rolled back
    #[error("Payout of {amount} to {winner} failed in round {round} (request {request_id}): {source}")]
    PayoutFailed {
        round: RoundId,
        request_id: RequestId,
        winner: Address,
        amount: U256,
        #[source]
        source: PayoutError,
    },
}

/// Failure reported by the randomness oracle.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OracleError {
    /// Billing subscription does not exist
    #[error("Invalid subscription: {0}")]
    InvalidSubscription(SubscriptionId),

    /// Too many words requested
    #[error("Too many random words: requested {requested}, max {max}")]
    TooManyWords { requested: u32, max: u32 },

    /// The oracle never issued this request, or already resolved it
    #[error("Nonexistent request: {0}")]
    NonexistentRequest(RequestId),

    /// Override words do not match the number requested
    #[error("Wrong number of words for {request_id}: expected {expected}, got {got}")]
    WrongNumberOfWords {
        request_id: RequestId,
        expected: u32,
        got: usize,
    },

    /// Subscription cannot cover the fulfillment fee
    #[error("Insufficient balance on subscription {subscription_id}: have {balance}, need {required}")]
    InsufficientBalance {
        subscription_id: SubscriptionId,
        balance: U256,
        required: U256,
    },

    /// Oracle transport failure
    #[error("Oracle unavailable: {0}")]
    Unavailable(String),
}

/// Rejected construction parameters.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Callback gas limit must be greater than zero")]
    ZeroCallbackGasLimit,

    #[error("Number of random words must be within 1..={max}, got {got}")]
    InvalidNumWords { got: u32, max: u32 },

    #[error("Request confirmations must be at most {max}, got {got}")]
    TooManyConfirmations { got: u16, max: u16 },

    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}

/// Raffle error taxonomy.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RaffleError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Precondition(#[from] PreconditionError),

    #[error(transparent)]
    FatalSettlement(#[from] FatalSettlementError),

    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Coarse classification for exhaustive handling at call sites.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    Precondition,
    FatalSettlement,
    Oracle,
    Config,
}

impl RaffleError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Precondition(_) => ErrorKind::Precondition,
            Self::FatalSettlement(_) => ErrorKind::FatalSettlement,
            Self::Oracle(_) => ErrorKind::Oracle,
            Self::Config(_) => ErrorKind::Config,
        }
    }

    /// True for a fulfillment whose request is no longer outstanding.
    #[must_use]
    pub fn is_stale_delivery(&self) -> bool {
        matches!(
            self,
            Self::Precondition(PreconditionError::UnknownRequest { .. })
        )
    }

    /// Short label used as a metrics reason.
    #[must_use]
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Validation(ValidationError::InsufficientFee { .. }) => "insufficient_fee",
            Self::Validation(ValidationError::RoundNotOpen { .. }) => "round_not_open",
            Self::Validation(ValidationError::PoolOverflow) => "pool_overflow",
            Self::Precondition(PreconditionError::UpkeepNotNeeded { .. }) => "upkeep_not_needed",
            Self::Precondition(PreconditionError::UnknownRequest { .. }) => "unknown_request",
            Self::Precondition(PreconditionError::NoRandomWords { .. }) => "no_random_words",
            Self::Precondition(PreconditionError::RequestAlreadyOutstanding { .. }) => {
                "request_outstanding"
            }
            Self::Precondition(PreconditionError::RoundNotCalculating { .. }) => {
                "round_not_calculating"
            }
            Self::Precondition(PreconditionError::EmptyRound { .. }) => "empty_round",
            Self::FatalSettlement(_) => "payout_failed",
            Self::Oracle(_) => "oracle",
            Self::Config(_) => "config",
        }
    }
}

/// Result type for raffle operations
pub type RaffleResult<T> = Result<T, RaffleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_fee_message() {
        let err = ValidationError::InsufficientFee {
            sent: U256::from(5u64),
            required: U256::from(10u64),
        };
        assert!(err.to_string().contains("sent 5, required 10"));
    }

    #[test]
    fn test_kind_follows_taxonomy() {
        let err: RaffleError = ValidationError::RoundNotOpen {
            state: RoundState::Calculating,
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.reason(), "round_not_open");

        let err: RaffleError = OracleError::InvalidSubscription(9).into();
        assert_eq!(err.kind(), ErrorKind::Oracle);
    }

    #[test]
    fn test_stale_delivery_detection() {
        let err: RaffleError = PreconditionError::UnknownRequest {
            request_id: RequestId::from(1),
            outstanding: None,
        }
        .into();
        assert!(err.is_stale_delivery());

        let err: RaffleError = PreconditionError::NoRandomWords {
            request_id: RequestId::from(1),
        }
        .into();
        assert!(!err.is_stale_delivery());
    }

    #[test]
    fn test_payout_failed_carries_source() {
        let err = FatalSettlementError::PayoutFailed {
            round: 1,
            request_id: RequestId::from(3),
            winner: Address::repeat_byte(1),
            amount: U256::from(50u64),
            source: PayoutError::Unavailable("down".into()),
        };
        assert!(err.to_string().contains("down"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
