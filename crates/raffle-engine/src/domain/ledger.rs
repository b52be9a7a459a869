//! # Entry Ledger
//!
//! Ordered entrants of the current round plus the pooled balance.
//!
//! The entrant list and the balance only change together: `record_entry`
//! appends and adds, `clear` empties and zeroes. Insertion order is
//! significant because the winner is picked by index.

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use shared_types::{Address, U256};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryLedger {
    entrants: Vec<Address>,
    balance: U256,
}

impl EntryLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `payer` and add `amount` to the pool.
    ///
    /// Returns the entrant count after the entry. Nothing changes on error.
    pub fn record_entry(&mut self, payer: Address, amount: U256) -> Result<usize, ValidationError> {
        let balance = self
            .balance
            .checked_add(amount)
            .ok_or(ValidationError::PoolOverflow)?;
        self.entrants.push(payer);
        self.balance = balance;
        Ok(self.entrants.len())
    }

    #[must_use]
    pub fn entrant_at(&self, index: usize) -> Option<Address> {
        self.entrants.get(index).copied()
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.entrants.len()
    }

    #[must_use]
    pub fn balance(&self) -> U256 {
        self.balance
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entrants.is_empty()
    }

    #[must_use]
    pub fn entrants(&self) -> &[Address] {
        &self.entrants
    }

    /// Empty the entrant list and zero the pool, returning the old pool.
    pub fn clear(&mut self) -> U256 {
        self.entrants.clear();
        std::mem::take(&mut self.balance)
    }
}
