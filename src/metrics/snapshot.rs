use serde::Serialize;

/// Point-in-time view of a batch, published to progress watchers.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    pub targets_queued: u64,
    pub targets_processed: u64,
    pub targets_scraped: u64,
    pub targets_failed: u64,
    pub records_extracted: u64,
    pub active_workers: u64,
    /// Percentage of processed targets that produced a record.
    pub success_rate: f64,
    pub avg_response_time_ms: u64,
    pub targets_per_second: f64,
    pub elapsed_seconds: f64,
}

impl MetricsSnapshot {
    /// Targets queued but not yet finished.
    pub fn pending(&self) -> u64 {
        self.targets_queued.saturating_sub(self.targets_processed)
    }
}
