use crate::config::ScraperConfig;
use crate::error::{Error, Result};
use crate::extract::{resolve_page_url, MetricExtractor};
use crate::fetcher::{HttpFetcher, PageFetcher};
use crate::record::MetricsRecord;
use std::sync::Arc;

/// Scrapes one target: resolve its page URL, fetch, extract.
pub struct SiteScraper {
    config: Arc<ScraperConfig>,
    fetcher: Arc<dyn PageFetcher>,
    extractor: Arc<MetricExtractor>,
}

impl SiteScraper {
    pub fn new(config: Arc<ScraperConfig>, fetcher: Arc<dyn PageFetcher>) -> Self {
        Self {
            config,
            fetcher,
            extractor: Arc::new(MetricExtractor::new()),
        }
    }

    /// Uses an [`HttpFetcher`] built from `config`.
    pub fn with_http(config: Arc<ScraperConfig>) -> Result<Self> {
        let fetcher = Arc::new(HttpFetcher::new(&config)?);
        Ok(Self::new(config, fetcher))
    }

    pub fn page_url(&self, target: &str) -> String {
        resolve_page_url(target, &self.config)
    }

    /// Only fetch errors are returned; extraction misses become `None` fields.
    /// Parsing runs on the blocking pool so workers extract in parallel.
    pub async fn scrape_one(&self, target: &str) -> Result<MetricsRecord> {
        let url = self.page_url(target);
        log::info!("Visiting: {}", url);
        let html = self.fetcher.fetch(&url).await?;

        let extractor = self.extractor.clone();
        tokio::task::spawn_blocking(move || extractor.extract(&html, &url))
            .await
            .map_err(|e| Error::Internal(format!("extraction task failed: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct RecordingFetcher {
        requested: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl PageFetcher for RecordingFetcher {
        async fn fetch(&self, url: &str) -> Result<String> {
            self.requested.lock().unwrap().push(url.to_string());
            if url.ends_with("down.com") {
                return Err(Error::Internal("connection refused".to_string()));
            }
            if url.ends_with("huge.com") {
                let rows = "<div>Direct <b>1%</b></div>".repeat(50_000);
                return Ok(format!("<html><body>{}<p>Global Rank 7</p></body></html>", rows));
            }
            Ok("<html><body><p>Global Rank 42</p></body></html>".to_string())
        }
    }

    fn scraper(fetcher: Arc<RecordingFetcher>) -> SiteScraper {
        let config = ScraperConfig::new("https://www.similarweb.com/website", "ua", Duration::from_secs(1));
        SiteScraper::new(Arc::new(config), fetcher)
    }

    #[tokio::test]
    async fn resolves_fetches_and_extracts() {
        let fetcher = Arc::new(RecordingFetcher::default());
        let record = scraper(fetcher.clone()).scrape_one("https://www.Example.com/").await.unwrap();

        assert_eq!(
            *fetcher.requested.lock().unwrap(),
            vec!["https://www.similarweb.com/website/example.com".to_string()]
        );
        assert_eq!(record.url, "https://www.similarweb.com/website/example.com");
        assert_eq!(record.name, "example.com");
        assert_eq!(record.global_rank, Some(42));
    }

    #[tokio::test]
    async fn fetch_errors_propagate() {
        let fetcher = Arc::new(RecordingFetcher::default());
        let result = scraper(fetcher).scrape_one("down.com").await;
        assert!(matches!(result, Err(Error::Internal(_))));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn parsing_does_not_block_the_runtime() {
        let fetcher = Arc::new(RecordingFetcher::default());
        let scraper = scraper(fetcher);
        let ticks = AtomicUsize::new(0);

        let ticker = async {
            loop {
                tokio::time::sleep(Duration::from_millis(1)).await;
                ticks.fetch_add(1, Ordering::SeqCst);
            }
        };
        let record = tokio::select! {
            biased;
            record = scraper.scrape_one("huge.com") => record.unwrap(),
            _ = ticker => unreachable!("ticker never finishes"),
        };

        assert_eq!(record.global_rank, Some(7));
        assert_eq!(record.percentages["directTraffic"], Some(1.0));
        assert!(ticks.load(Ordering::SeqCst) > 0);
    }
}
