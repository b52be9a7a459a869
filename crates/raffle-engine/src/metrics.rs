//! Metrics hooks for raffle operations
//!
//! The service reports every accepted and rejected operation through a
//! [`MetricsRecorder`]. [`Metrics`] keeps in-process atomic counters;
//! the node plugs in a Prometheus-backed recorder instead.

use shared_types::U256;
use std::sync::atomic::{AtomicU64, Ordering};

/// Trait for metrics recording implementations
///
/// Implement this to export raffle activity to an external metrics system.
pub trait MetricsRecorder: Send + Sync {
    /// Entry accepted; `pool` is the balance after it
    fn record_entry(&self, amount: U256, pool: U256);

    /// Entry rejected
    fn record_entry_rejected(&self, reason: &'static str);

    /// Round closed and randomness requested
    fn record_upkeep_performed(&self);

    /// Upkeep rejected (predicate false or oracle failure)
    fn record_upkeep_rejected(&self, reason: &'static str);

    /// Round settled and paid
    fn record_settlement(&self, amount: U256);

    /// Payout failed and the settlement was rolled back
    fn record_payout_failure(&self);

    /// Fulfillment for a request that is not outstanding
    fn record_stale_fulfillment(&self);
}

/// In-process atomic counters.
#[derive(Default)]
pub struct Metrics {
    pub entries_accepted: AtomicU64,
    pub entries_rejected: AtomicU64,
    pub upkeeps_performed: AtomicU64,
    pub upkeeps_rejected: AtomicU64,
    pub rounds_settled: AtomicU64,
    pub payout_failures: AtomicU64,
    pub stale_fulfillments: AtomicU64,
    /// Low 64 bits of the current pool
    pub pool_balance: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            entries_accepted: self.entries_accepted.load(Ordering::Relaxed),
            entries_rejected: self.entries_rejected.load(Ordering::Relaxed),
            upkeeps_performed: self.upkeeps_performed.load(Ordering::Relaxed),
            upkeeps_rejected: self.upkeeps_rejected.load(Ordering::Relaxed),
            rounds_settled: self.rounds_settled.load(Ordering::Relaxed),
            payout_failures: self.payout_failures.load(Ordering::Relaxed),
            stale_fulfillments: self.stale_fulfillments.load(Ordering::Relaxed),
            pool_balance: self.pool_balance.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time metrics snapshot
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub entries_accepted: u64,
    pub entries_rejected: u64,
    pub upkeeps_performed: u64,
    pub upkeeps_rejected: u64,
    pub rounds_settled: u64,
    pub payout_failures: u64,
    pub stale_fulfillments: u64,
    pub pool_balance: u64,
}

impl MetricsRecorder for Metrics {
    fn record_entry(&self, _amount: U256, pool: U256) {
        self.entries_accepted.fetch_add(1, Ordering::Relaxed);
        self.pool_balance.store(pool.low_u64(), Ordering::Relaxed);
    }

    fn record_entry_rejected(&self, _reason: &'static str) {
        self.entries_rejected.fetch_add(1, Ordering::Relaxed);
    }

    fn record_upkeep_performed(&self) {
        self.upkeeps_performed.fetch_add(1, Ordering::Relaxed);
    }

    fn record_upkeep_rejected(&self, _reason: &'static str) {
        self.upkeeps_rejected.fetch_add(1, Ordering::Relaxed);
    }

    fn record_settlement(&self, _amount: U256) {
        self.rounds_settled.fetch_add(1, Ordering::Relaxed);
        self.pool_balance.store(0, Ordering::Relaxed);
    }

    fn record_payout_failure(&self) {
        self.payout_failures.fetch_add(1, Ordering::Relaxed);
    }

    fn record_stale_fulfillment(&self) {
        self.stale_fulfillments.fetch_add(1, Ordering::Relaxed);
    }
}

/// No-op metrics recorder for when metrics are disabled
#[derive(Default)]
pub struct NoOpMetrics;

impl MetricsRecorder for NoOpMetrics {
    fn record_entry(&self, _: U256, _: U256) {}
    fn record_entry_rejected(&self, _: &'static str) {}
    fn record_upkeep_performed(&self) {}
    fn record_upkeep_rejected(&self, _: &'static str) {}
    fn record_settlement(&self, _: U256) {}
    fn record_payout_failure(&self) {}
    fn record_stale_fulfillment(&self) {}
}
