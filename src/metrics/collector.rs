use crate::metrics::snapshot::MetricsSnapshot;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Default)]
struct Counters {
    queued: AtomicU64,
    scraped: AtomicU64,
    failed: AtomicU64,
    records: AtomicU64,
    active: AtomicU64,
    fetch_time_ms: AtomicU64,
}

/// Lock-free run counters shared by every worker of a batch.
#[derive(Debug, Clone)]
pub struct MetricsCollector {
    counters: Arc<Counters>,
    started: Instant,
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self {
            counters: Arc::new(Counters::default()),
            started: Instant::now(),
        }
    }
}

/// Marks one worker busy until dropped.
pub struct ActiveWorker {
    counters: Arc<Counters>,
}

impl Drop for ActiveWorker {
    fn drop(&mut self) {
        self.counters.active.fetch_sub(1, Ordering::SeqCst);
    }
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_targets_queued(&self, count: u64) {
        self.counters.queued.fetch_add(count, Ordering::SeqCst);
    }

    /// Counts a worker as active for the lifetime of the returned guard.
    pub fn worker_started(&self) -> ActiveWorker {
        self.counters.active.fetch_add(1, Ordering::SeqCst);
        ActiveWorker {
            counters: self.counters.clone(),
        }
    }

    /// A target whose page was fetched and turned into a record.
    pub fn record_scraped(&self, elapsed: Duration) {
        self.counters.scraped.fetch_add(1, Ordering::SeqCst);
        self.counters.records.fetch_add(1, Ordering::SeqCst);
        self.add_fetch_time(elapsed);
    }

    pub fn record_failed(&self, elapsed: Duration) {
        self.counters.failed.fetch_add(1, Ordering::SeqCst);
        self.add_fetch_time(elapsed);
    }

    fn add_fetch_time(&self, elapsed: Duration) {
        let ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        self.counters.fetch_time_ms.fetch_add(ms, Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let c = &self.counters;
        let scraped = c.scraped.load(Ordering::SeqCst);
        let failed = c.failed.load(Ordering::SeqCst);
        let processed = scraped + failed;
        let elapsed = self.started.elapsed().as_secs_f64();

        MetricsSnapshot {
            targets_queued: c.queued.load(Ordering::SeqCst),
            targets_processed: processed,
            targets_scraped: scraped,
            targets_failed: failed,
            records_extracted: c.records.load(Ordering::SeqCst),
            active_workers: c.active.load(Ordering::SeqCst),
            success_rate: ratio(scraped as f64 * 100.0, processed as f64),
            avg_response_time_ms: c.fetch_time_ms.load(Ordering::SeqCst).checked_div(processed).unwrap_or(0),
            targets_per_second: ratio(processed as f64, elapsed),
            elapsed_seconds: elapsed,
        }
    }
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 { numerator / denominator } else { 0.0 }
}
