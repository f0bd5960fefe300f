use crate::config::ScraperConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;

/// The network boundary: one GET per page.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Returns the page body. Transport failures and non-2xx statuses are
    /// errors.
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// `reqwest` fetcher sharing one connection pool, user agent and timeout
/// across all requests of a run.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        log::debug!("Fetching URL: {}", url);

        let res = self.client.get(url).send().await?;
        let status = res.status();
        if !status.is_success() {
            return Err(Error::Status {
                url: url.to_string(),
                status,
            });
        }

        let html = res.text().await?;
        log::debug!("HTML length: {} bytes", html.len());
        Ok(html)
    }
}
