//! # Metrics Adapter
//!
//! Bridges the engine's `MetricsRecorder` hooks to the Prometheus registry.

use raffle_engine::MetricsRecorder;
use raffle_telemetry::{
    metric_inc, ENTRIES, ENTRIES_REJECTED, PAYOUT_FAILURES, POOL_BALANCE, ROUNDS_SETTLED,
    STALE_FULFILLMENTS, UPKEEPS,
};
use shared_types::U256;

/// Records raffle activity in the global Prometheus metrics.
#[derive(Debug, Default, Clone, Copy)]
pub struct PrometheusRecorder;

impl MetricsRecorder for PrometheusRecorder {
    fn record_entry(&self, _amount: U256, pool: U256) {
        metric_inc!(ENTRIES);
        POOL_BALANCE.set(wei_to_f64(pool));
    }

    fn record_entry_rejected(&self, reason: &'static str) {
        metric_inc!(ENTRIES_REJECTED, &[reason]);
    }

    fn record_upkeep_performed(&self) {
        metric_inc!(UPKEEPS, &["performed"]);
    }

    fn record_upkeep_rejected(&self, reason: &'static str) {
        metric_inc!(UPKEEPS, &[reason]);
    }

    fn record_settlement(&self, _amount: U256) {
        metric_inc!(ROUNDS_SETTLED);
        POOL_BALANCE.set(0.0);
    }

    fn record_payout_failure(&self) {
        metric_inc!(PAYOUT_FAILURES);
    }

    fn record_stale_fulfillment(&self) {
        metric_inc!(STALE_FULFILLMENTS);
    }
}

/// Lossy wei to gauge value; saturates above `u128::MAX`.
fn wei_to_f64(wei: U256) -> f64 {
    if wei > U256::from(u128::MAX) {
        f64::MAX
    } else {
        wei.as_u128() as f64
    }
}
