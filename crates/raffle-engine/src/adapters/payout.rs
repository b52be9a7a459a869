//! In-memory payout gateway.
//!
//! Credits winners in a local balance table. Individual recipients can be
//! made to refuse transfers, and the whole gateway can be taken offline,
//! to exercise the settlement rollback path.

use crate::error::PayoutError;
use crate::ports::PayoutGateway;
use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{Address, U256};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// A completed transfer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PayoutRecord {
    pub to: Address,
    pub amount: U256,
}

#[derive(Default)]
struct LedgerState {
    balances: HashMap<Address, U256>,
    transfers: Vec<PayoutRecord>,
    rejecting: HashSet<Address>,
    unavailable: bool,
}

#[derive(Default)]
pub struct InMemoryPayoutLedger {
    state: RwLock<LedgerState>,
}

impl InMemoryPayoutLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `recipient` refuse incoming transfers.
    pub fn reject(&self, recipient: Address) {
        self.state.write().rejecting.insert(recipient);
    }

    /// Undo [`reject`](Self::reject).
    pub fn accept(&self, recipient: Address) {
        self.state.write().rejecting.remove(&recipient);
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.state.write().unavailable = unavailable;
    }

    pub fn balance_of(&self, account: Address) -> U256 {
        self.state
            .read()
            .balances
            .get(&account)
            .copied()
            .unwrap_or_default()
    }

    pub fn transfers(&self) -> Vec<PayoutRecord> {
        self.state.read().transfers.clone()
    }
}

#[async_trait]
impl PayoutGateway for InMemoryPayoutLedger {
    async fn transfer(&self, to: Address, amount: U256) -> Result<(), PayoutError> {
        let mut state = self.state.write();
        if state.unavailable {
            return Err(PayoutError::Unavailable("payout ledger offline".into()));
        }
        if state.rejecting.contains(&to) {
            return Err(PayoutError::Rejected {
                recipient: to,
                reason: "recipient refused transfer".into(),
            });
        }

        let balance = state.balances.entry(to).or_default();
        *balance = balance.saturating_add(amount);
        state.transfers.push(PayoutRecord { to, amount });

        debug!(to = %to, amount = %amount, "Payout credited");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_transfer_credits_recipient() {
        let ledger = InMemoryPayoutLedger::new();
        let winner = Address::repeat_byte(9);

        ledger.transfer(winner, U256::from(5u64)).await.unwrap();
        ledger.transfer(winner, U256::from(7u64)).await.unwrap();

        assert_eq!(ledger.balance_of(winner), U256::from(12u64));
        assert_eq!(ledger.transfers().len(), 2);
    }

    #[tokio::test]
    async fn test_rejecting_recipient() {
        let ledger = InMemoryPayoutLedger::new();
        let winner = Address::repeat_byte(9);
        ledger.reject(winner);

        let result = ledger.transfer(winner, U256::one()).await;
        assert!(matches!(result, Err(PayoutError::Rejected { .. })));
        assert!(ledger.balance_of(winner).is_zero());

        ledger.accept(winner);
        assert!(ledger.transfer(winner, U256::one()).await.is_ok());
    }

    #[tokio::test]
    async fn test_unavailable_gateway() {
        let ledger = InMemoryPayoutLedger::new();
        ledger.set_unavailable(true);

        let result = ledger.transfer(Address::repeat_byte(1), U256::one()).await;
        assert!(matches!(result, Err(PayoutError::Unavailable(_))));
        assert!(ledger.transfers().is_empty());
    }
}
