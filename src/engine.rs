use crate::error::Error;
use crate::metrics::collector::MetricsCollector;
use crate::metrics::snapshot::MetricsSnapshot;
use crate::record::MetricsRecord;
use crate::scraper::SiteScraper;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, watch};

/// Result of scraping a single target.
#[derive(Debug)]
pub enum ScrapeOutcome {
    Scraped { target: String, record: MetricsRecord },
    Failed { target: String, error: Error },
}

/// Everything a batch produced. Records are in completion order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub records: Vec<MetricsRecord>,
    pub failures: Vec<(String, Error)>,
}

impl BatchReport {
    pub fn absorb(mut self, outcome: ScrapeOutcome) -> Self {
        match outcome {
            ScrapeOutcome::Scraped { target, record } => {
                log::info!("Finished scraping: {}", target);
                self.records.push(record);
            }
            ScrapeOutcome::Failed { target, error } => {
                log::error!("Error scraping {}: {}", target, error);
                self.failures.push((target, error));
            }
        }
        self
    }

    pub fn attempted(&self) -> usize {
        self.records.len() + self.failures.len()
    }
}

/// Runs targets through a fixed number of concurrent workers.
pub struct ScrapeEngine {
    concurrency: usize,
    metrics: Arc<MetricsCollector>,
}

impl ScrapeEngine {
    pub fn new(concurrency: usize, metrics: Option<Arc<MetricsCollector>>) -> Self {
        Self {
            concurrency: concurrency.max(1),
            metrics: metrics.unwrap_or_else(|| Arc::new(MetricsCollector::new())),
        }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Attempts every target exactly once. A failed target is logged and
    /// reported but never stops the others.
    pub async fn run(&self, scraper: Arc<SiteScraper>, targets: Vec<String>) -> BatchReport {
        if targets.is_empty() {
            log::warn!("No targets to scrape.");
            return BatchReport::default();
        }

        let total = targets.len();
        log::info!(
            "Starting scrape for {} target(s) using {} worker(s)",
            total,
            self.concurrency
        );
        self.metrics.add_targets_queued(total as u64);

        let (outcomes_tx, outcomes_rx) = mpsc::channel(self.concurrency * 2);
        let concurrency = self.concurrency;
        let metrics = self.metrics.clone();

        let workers = tokio::spawn(async move {
            stream::iter(targets)
                .for_each_concurrent(concurrency, |target| {
                    let scraper = scraper.clone();
                    let outcomes_tx = outcomes_tx.clone();
                    let metrics = metrics.clone();

                    async move {
                        let outcome = {
                            let _active = metrics.worker_started();
                            let start_time = Instant::now();
                            match scraper.scrape_one(&target).await {
                                Ok(record) => {
                                    metrics.record_scraped(start_time.elapsed());
                                    ScrapeOutcome::Scraped { target, record }
                                }
                                Err(error) => {
                                    metrics.record_failed(start_time.elapsed());
                                    ScrapeOutcome::Failed { target, error }
                                }
                            }
                        };
                        let _ = outcomes_tx.send(outcome).await;
                    }
                })
                .await;

            // The collector finishes once the last sender is gone.
            drop(outcomes_tx);
            log::debug!("Worker pool finished.");
        });

        let report = tokio_stream::wrappers::ReceiverStream::new(outcomes_rx)
            .fold(BatchReport::default(), |report, outcome| async move {
                report.absorb(outcome)
            })
            .await;

        if let Err(e) = workers.await {
            log::error!("Worker pool aborted: {}", e);
        }

        log::info!(
            "Scraping finished. Successfully scraped {}/{} target(s).",
            report.records.len(),
            total
        );
        report
    }

    pub fn get_metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    pub fn watch_metrics(&self) -> watch::Receiver<MetricsSnapshot> {
        let (tx, rx) = watch::channel(self.metrics.snapshot());
        let metrics = self.metrics.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_millis(500));
            loop {
                interval.tick().await;
                if tx.send(metrics.snapshot()).is_err() {
                    break;
                }
            }
        });
        rx
    }
}
