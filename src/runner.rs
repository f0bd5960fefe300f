use crate::config::{ConfigLoader, ScraperConfig};
use crate::engine::ScrapeEngine;
use crate::error::Result;
use crate::input::load_targets;
use crate::metrics::snapshot::MetricsSnapshot;
use crate::output::{JsonOutput, OutputHandler};
use crate::record::MetricsRecord;
use crate::scraper::SiteScraper;
use chrono::Utc;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub input: PathBuf,
    pub output: PathBuf,
    pub config: PathBuf,
    /// Overrides `maxWorkers` from the settings file when greater than zero.
    pub max_workers: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub targets: usize,
    pub scraped: usize,
    pub failed: usize,
    /// Set when records were exported.
    pub output: Option<PathBuf>,
    pub metrics: MetricsSnapshot,
}

/// Loads settings and targets, scrapes every target and exports the stamped
/// records. Only setup and output failures are returned as errors.
pub async fn run(options: &RunOptions, progress: Option<Arc<MultiProgress>>) -> Result<RunSummary> {
    let mut settings = ConfigLoader::load(&options.config);
    if let Some(workers) = options.max_workers.filter(|&n| n > 0) {
        settings.max_workers = u32::try_from(workers).unwrap_or(u32::MAX);
    }
    log::debug!("Using settings: {:?}", settings);

    let targets = load_targets(&options.input);
    log::info!("Loaded {} target(s) from {}", targets.len(), options.input.display());
    let total = targets.len();

    let config = Arc::new(ScraperConfig::from_settings(&settings));
    let scraper = Arc::new(SiteScraper::with_http(config)?);
    let engine = ScrapeEngine::new(settings.max_workers as usize, None);

    let progress_bar = match progress {
        Some(multi) if total > 0 => Some(spawn_progress(&engine, &multi, total as u64)?),
        _ => None,
    };

    let report = engine.run(scraper, targets).await;

    if let Some((pb, task)) = progress_bar {
        task.abort();
        let snapshot = engine.get_metrics();
        pb.set_position(snapshot.targets_processed);
        pb.finish_with_message(format!(
            "Records: {} | Success: {:.1}% - Completed",
            snapshot.records_extracted, snapshot.success_rate
        ));
    }

    let failed = report.failures.len();
    let mut records = report.records;
    stamp_records(&mut records, settings.snapshot_date.as_deref());

    let output = if records.is_empty() {
        log::warn!("No data was scraped. Nothing will be exported.");
        None
    } else {
        export(&records, options.output.clone()).await?;
        log::info!("Exported {} record(s) to {}", records.len(), options.output.display());
        Some(options.output.clone())
    };

    Ok(RunSummary {
        targets: total,
        scraped: records.len(),
        failed,
        output,
        metrics: engine.get_metrics(),
    })
}

/// Fills `snapshotDate` (settings override, else today) and `scrapedAt` on
/// records that lack them.
pub fn stamp_records(records: &mut [MetricsRecord], snapshot_date: Option<&str>) {
    let today = Utc::now().format("%Y-%m-%d").to_string();
    let snapshot_date = snapshot_date.unwrap_or(&today);
    for record in records.iter_mut() {
        record.stamp(Some(snapshot_date), Utc::now());
    }
}

async fn export(records: &[MetricsRecord], path: PathBuf) -> Result<()> {
    let mut output = JsonOutput::new(path).inspect_err(|e| {
        log::error!("Failed to open JSON output: {}", e);
    })?;
    for record in records {
        output.write(record).await?;
    }
    output.close().await.inspect_err(|e| {
        log::error!("Failed to write JSON output to {}: {}", output.path().display(), e);
    })
}

fn spawn_progress(
    engine: &ScrapeEngine,
    multi: &MultiProgress,
    total: u64,
) -> Result<(ProgressBar, tokio::task::JoinHandle<()>)> {
    let pb = multi.add(ProgressBar::new(total));
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
            .map_err(|e| crate::error::Error::Internal(e.to_string()))?
            .progress_chars("#>-"),
    );

    let mut metrics_rx = engine.watch_metrics();
    let pb_clone = pb.clone();
    let task = tokio::spawn(async move {
        while metrics_rx.changed().await.is_ok() {
            let snapshot: MetricsSnapshot = metrics_rx.borrow().clone();
            pb_clone.set_position(snapshot.targets_processed);
            pb_clone.set_message(progress_message(&snapshot));
        }
    });
    Ok((pb, task))
}

fn progress_message(snapshot: &MetricsSnapshot) -> String {
    format!(
        "Records: {} | Success: {:.1}% | Active: {} | Pending: {} | {:.1} targets/s",
        snapshot.records_extracted,
        snapshot.success_rate,
        snapshot.active_workers,
        snapshot.pending(),
        snapshot.targets_per_second
    )
}
