use crate::config::ScraperConfig;
use crate::error::ScrapeError;
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

use super::PageFetcher;

/// Owns the one `reqwest::Client` used for a run. No retries: a failed GET
/// is reported once.
pub struct HttpClient {
    inner: reqwest::Client,
}

impl HttpClient {
    pub fn new(config: &ScraperConfig) -> Result<Self, ScrapeError> {
        if config.accept_invalid_certs {
            warn!("TLS certificate verification is disabled");
        }

        let inner = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .gzip(true)
            // Accept cookies so session-based pages work
            .cookie_store(true)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|e| ScrapeError::Client(e.to_string()))?;

        Ok(Self { inner })
    }

    /// Fetch a URL as text. Non-2xx statuses are errors.
    pub async fn get_text(&self, url: &str) -> Result<String, ScrapeError> {
        debug!("GET {}", url);

        let resp = self.inner.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ScrapeError::Status {
                url: url.to_string(),
                status,
            });
        }

        Ok(resp.text().await?)
    }
}

#[async_trait]
impl PageFetcher for HttpClient {
    async fn fetch_page(&self, url: &str) -> Result<String, ScrapeError> {
        self.get_text(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builds_with_defaults_and_insecure() {
        assert!(HttpClient::new(&ScraperConfig::default()).is_ok());

        let insecure = ScraperConfig {
            accept_invalid_certs: true,
            ..ScraperConfig::default()
        };
        assert!(HttpClient::new(&insecure).is_ok());
    }
}
