//! Metrics collection for observability
//!
//! # Metrics
//!
//! - `token_submissions_committed_total{op}` - Calls applied to the ledger
//! - `token_submissions_rejected_total{op}` - Calls rejected before applying
//! - `token_events_emitted_total` - Events broadcast to observers
//! - `token_holders` - Accounts with a non-zero balance

use prometheus::{IntCounter, IntCounterVec, IntGauge, Opts, Registry};
use std::sync::Arc;

/// Metrics collector
///
/// Collectors live on a private registry, so several ledgers (or tests) in
/// one process do not collide.
#[derive(Clone)]
pub struct Metrics {
    /// Committed calls by operation
    pub committed: IntCounterVec,

    /// Rejected calls by operation
    pub rejected: IntCounterVec,

    /// Events emitted
    pub events_total: IntCounter,

    /// Current holder count
    pub holders: IntGauge,

    /// Prometheus registry
    pub registry: Arc<Registry>,
}

impl std::fmt::Debug for Metrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Metrics")
            .field("events_total", &self.events_total.get())
            .field("holders", &self.holders.get())
            .finish()
    }
}

impl Metrics {
    /// Create new metrics collector
    pub fn new() -> prometheus::Result<Self> {
        let registry = Arc::new(Registry::new());

        let committed = IntCounterVec::new(
            Opts::new(
                "token_submissions_committed_total",
                "Calls applied to the ledger",
            ),
            &["op"],
        )?;
        registry.register(Box::new(committed.clone()))?;

        let rejected = IntCounterVec::new(
            Opts::new(
                "token_submissions_rejected_total",
                "Calls rejected before applying",
            ),
            &["op"],
        )?;
        registry.register(Box::new(rejected.clone()))?;

        let events_total = IntCounter::new("token_events_emitted_total", "Events emitted")?;
        registry.register(Box::new(events_total.clone()))?;

        let holders = IntGauge::new("token_holders", "Accounts with a non-zero balance")?;
        registry.register(Box::new(holders.clone()))?;

        Ok(Self {
            committed,
            rejected,
            events_total,
            holders,
            registry,
        })
    }

    /// Record a committed call and its events
    pub fn record_commit(&self, op: &str, events: usize) {
        self.committed.with_label_values(&[op]).inc();
        self.events_total.inc_by(events as u64);
    }

    /// Record a rejected call
    pub fn record_rejection(&self, op: &str) {
        self.rejected.with_label_values(&[op]).inc();
    }

    /// Update holder count
    pub fn set_holders(&self, holders: usize) {
        self.holders.set(holders as i64);
    }

    /// Get metrics registry
    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = Metrics::new().unwrap();
        assert_eq!(metrics.events_total.get(), 0);
        assert_eq!(metrics.holders.get(), 0);

        // A second collector must not clash with the first.
        assert!(Metrics::new().is_ok());
    }

    #[test]
    fn test_record_commit_and_rejection() {
        let metrics = Metrics::new().unwrap();
        metrics.record_commit("mint", 2);
        metrics.record_commit("transfer", 1);
        metrics.record_rejection("mint");

        assert_eq!(metrics.committed.with_label_values(&["mint"]).get(), 1);
        assert_eq!(metrics.rejected.with_label_values(&["mint"]).get(), 1);
        assert_eq!(metrics.events_total.get(), 3);
        assert_eq!(metrics.registry().gather().len(), 4);
    }
}
