//! Prometheus metrics for the raffle.
//!
//! All metrics follow the naming convention: `raffle_<metric>_<unit>`
//!
//! ## Metric Types
//!
//! - **Counter**: Monotonically increasing value (e.g., raffle_entries_total)
//! - **Gauge**: Value that can go up or down (e.g., raffle_pool_balance_wei)

use lazy_static::lazy_static;
use prometheus::{Counter, CounterVec, Encoder, Gauge, Opts, Registry, TextEncoder};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // ENTRY METRICS
    // =========================================================================

    /// Accepted entries
    pub static ref ENTRIES: Counter = Counter::new(
        "raffle_entries_total",
        "Total number of accepted raffle entries"
    ).expect("metric creation failed");

    /// Rejected entries by reason
    pub static ref ENTRIES_REJECTED: CounterVec = CounterVec::new(
        Opts::new("raffle_entries_rejected_total", "Rejected raffle entries"),
        &["reason"]  // reason: insufficient_fee/round_not_open/pool_overflow
    ).expect("metric creation failed");

    /// Current pool, in wei
    pub static ref POOL_BALANCE: Gauge = Gauge::new(
        "raffle_pool_balance_wei",
        "Current prize pool in wei"
    ).expect("metric creation failed");

    // =========================================================================
    // UPKEEP METRICS
    // =========================================================================

    /// Upkeep attempts by outcome
    pub static ref UPKEEPS: CounterVec = CounterVec::new(
        Opts::new("raffle_upkeeps_total", "Upkeep attempts"),
        &["outcome"]  // outcome: performed/upkeep_not_needed/oracle
    ).expect("metric creation failed");

    // =========================================================================
    // SETTLEMENT METRICS
    // =========================================================================

    /// Rounds paid out
    pub static ref ROUNDS_SETTLED: Counter = Counter::new(
        "raffle_rounds_settled_total",
        "Total number of settled rounds"
    ).expect("metric creation failed");

    /// Payouts that failed and were rolled back
    pub static ref PAYOUT_FAILURES: Counter = Counter::new(
        "raffle_payout_failures_total",
        "Total payout failures"
    ).expect("metric creation failed");

    /// Deliveries for requests that were no longer outstanding
    pub static ref STALE_FULFILLMENTS: Counter = Counter::new(
        "raffle_stale_fulfillments_total",
        "Total fulfillments rejected as stale or duplicate"
    ).expect("metric creation failed");
}

/// Register all metrics with the global registry.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        // Entries
        Box::new(ENTRIES.clone()),
        Box::new(ENTRIES_REJECTED.clone()),
        Box::new(POOL_BALANCE.clone()),
        // Upkeep
        Box::new(UPKEEPS.clone()),
        // Settlement
        Box::new(ROUNDS_SETTLED.clone()),
        Box::new(PAYOUT_FAILURES.clone()),
        Box::new(STALE_FULFILLMENTS.clone()),
    ];

    for metric in metrics {
        REGISTRY
            .register(metric)
            .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    }
    Ok(())
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}
