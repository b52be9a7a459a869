//! # Domain Invariants
//!
//! Structural rules of the raffle state record. Checked after every
//! mutating operation in debug builds and by the property tests.

use super::round::RoundState;
use super::state::RaffleState;

/// Invariant: at most one outstanding request.
pub fn invariant_single_outstanding_request(state: &RaffleState) -> bool {
    state.requests.len() <= 1
}

/// Invariant: a request is outstanding exactly while CALCULATING.
pub fn invariant_request_iff_calculating(state: &RaffleState) -> bool {
    let calculating = state.round.state() == RoundState::Calculating;
    calculating == !state.requests.is_empty()
}

/// Invariant: an empty ledger holds no funds.
pub fn invariant_empty_ledger_has_no_balance(state: &RaffleState) -> bool {
    !state.ledger.is_empty() || state.ledger.balance().is_zero()
}

/// Invariant: a round under calculation has someone to pay.
pub fn invariant_calculating_has_entrants(state: &RaffleState) -> bool {
    state.round.is_open() || !state.ledger.is_empty()
}

/// Names of the invariants `state` violates.
pub fn violated_invariants(state: &RaffleState) -> Vec<&'static str> {
    let checks: [(&'static str, fn(&RaffleState) -> bool); 4] = [
        (
            "single_outstanding_request",
            invariant_single_outstanding_request,
        ),
        ("request_iff_calculating", invariant_request_iff_calculating),
        (
            "empty_ledger_has_no_balance",
            invariant_empty_ledger_has_no_balance,
        ),
        ("calculating_has_entrants", invariant_calculating_has_entrants),
    ];

    checks
        .iter()
        .filter(|(_, check)| !check(state))
        .map(|(name, _)| *name)
        .collect()
}
