//! # Round Lifecycle
//!
//! Two states only:
//!
//! ```text
//!            perform_upkeep (predicate true)
//!   ┌──────┐ ─────────────────────────────▶ ┌─────────────┐
//!   │ OPEN │                                │ CALCULATING │
//!   └──────┘ ◀───────────────────────────── └─────────────┘
//!               fulfill (matching request)
//! ```
//!
//! Mutating operations that need a particular state fail instead of
//! transitioning on their own.

use crate::error::{PreconditionError, ValidationError};
use serde::{Deserialize, Serialize};
use shared_types::{RoundId, Timestamp};
use std::fmt;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundState {
    /// Accepting entries
    #[default]
    Open,
    /// Closed to entries, awaiting randomness
    Calculating,
}

impl fmt::Display for RoundState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "OPEN"),
            Self::Calculating => write!(f, "CALCULATING"),
        }
    }
}

/// Round state plus the 1-based round counter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundStateMachine {
    state: RoundState,
    round_id: RoundId,
}

impl Default for RoundStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl RoundStateMachine {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: RoundState::Open,
            round_id: 1,
        }
    }

    #[must_use]
    pub fn state(&self) -> RoundState {
        self.state
    }

    #[must_use]
    pub fn round_id(&self) -> RoundId {
        self.round_id
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state == RoundState::Open
    }

    /// Gate for `enter`.
    pub fn ensure_open(&self) -> Result<(), ValidationError> {
        if self.is_open() {
            Ok(())
        } else {
            Err(ValidationError::RoundNotOpen { state: self.state })
        }
    }

    /// OPEN -> CALCULATING.
    pub fn close(&mut self) -> Result<(), ValidationError> {
        self.ensure_open()?;
        self.state = RoundState::Calculating;
        Ok(())
    }

    /// CALCULATING -> OPEN, starting the next round. Returns the new round id.
    pub fn reopen(&mut self) -> Result<RoundId, PreconditionError> {
        if self.state != RoundState::Calculating {
            return Err(PreconditionError::RoundNotCalculating { state: self.state });
        }
        self.state = RoundState::Open;
        self.round_id += 1;
        Ok(self.round_id)
    }
}

/// Time of the last settlement. Never moves backwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundClock {
    last_settlement: Timestamp,
}

impl RoundClock {
    #[must_use]
    pub fn starting_at(timestamp: Timestamp) -> Self {
        Self {
            last_settlement: timestamp,
        }
    }

    #[must_use]
    pub fn last_settlement(&self) -> Timestamp {
        self.last_settlement
    }

    /// Seconds since the last settlement; zero if `now` is behind it.
    #[must_use]
    pub fn elapsed(&self, now: Timestamp) -> u64 {
        now.saturating_sub(self.last_settlement)
    }

    /// Record a settlement at `now`, keeping the clock monotonic.
    pub fn advance_to(&mut self, now: Timestamp) -> Timestamp {
        self.last_settlement = self.last_settlement.max(now);
        self.last_settlement
    }
}
