pub mod coerce;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod extract;
pub mod fetcher;
pub mod input;
pub mod metrics;
pub mod output;
pub mod record;
pub mod runner;
pub mod scraper;
pub mod selector;

pub use config::{ConfigLoader, ScraperConfig, Settings};
pub use engine::{BatchReport, ScrapeEngine, ScrapeOutcome};
pub use error::{Error, Result};
pub use extract::{resolve_page_url, MetricExtractor};
pub use fetcher::{HttpFetcher, PageFetcher};
pub use metrics::collector::MetricsCollector;
pub use metrics::snapshot::MetricsSnapshot;
pub use record::MetricsRecord;
pub use runner::{run, RunOptions, RunSummary};
pub use scraper::SiteScraper;
