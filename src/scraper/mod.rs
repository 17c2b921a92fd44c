pub mod cleaner;
pub mod http_client;
pub mod parsers;

use crate::config::ScraperConfig;
use crate::error::ScrapeError;
use crate::models::{PriceLookup, PriceQuery, PriceResult};
use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, warn};
use url::Url;

use self::http_client::HttpClient;
use self::parsers::extract;

// ── Fetcher trait ─────────────────────────────────────────────────────────────

/// Swappable page source. `HttpClient` in production, canned pages in tests.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_page(&self, url: &str) -> Result<String, ScrapeError>;
}

// ── PriceCharting lookup ──────────────────────────────────────────────────────

pub struct PriceApi<F = HttpClient> {
    fetcher: F,
    site_host: String,
}

impl PriceApi<HttpClient> {
    pub fn new(config: &ScraperConfig) -> Result<Self, ScrapeError> {
        Ok(Self::with_fetcher(HttpClient::new(config)?, &config.site_host))
    }
}

impl<F: PageFetcher> PriceApi<F> {
    pub fn with_fetcher(fetcher: F, site_host: &str) -> Self {
        Self {
            fetcher,
            site_host: site_host.trim().trim_start_matches("www.").to_lowercase(),
        }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// True for http(s) URLs on the configured site or one of its subdomains.
    pub fn is_supported_url(&self, url: &str) -> bool {
        let Ok(parsed) = Url::parse(url.trim()) else { return false };
        if !matches!(parsed.scheme(), "http" | "https") {
            return false;
        }
        let Some(host) = parsed.host_str() else { return false };
        let host = host.to_lowercase();
        host == self.site_host || host.ends_with(&format!(".{}", self.site_host))
    }

    /// Fetch and extract one page, keeping the reason when it fails.
    ///
    /// A page that downloads but yields nothing is still `Ok`, with every
    /// derived field `None`.
    pub async fn lookup(&self, query: &PriceQuery) -> Result<PriceResult, ScrapeError> {
        if !self.is_supported_url(&query.url) {
            return Err(ScrapeError::UnsupportedUrl {
                url: query.url.clone(),
                host: self.site_host.clone(),
            });
        }

        let html = self.fetcher.fetch_page(query.url.trim()).await?;
        let result = extract(&html).with_url(query.url.clone());

        if result.card_name.is_none() {
            warn!("Could not extract card name from {}", query.url);
        }
        debug!("{}: {:?}", query.url, result);

        Ok(result)
    }

    /// Single-URL lookup: `NotFound` on any failure.
    pub async fn get_card_prices(&self, url: &str) -> PriceLookup {
        match self.lookup(&PriceQuery::new(url)).await {
            Ok(result) => PriceLookup::Found(result),
            Err(e) => {
                warn!("{}", e);
                PriceLookup::NotFound
            }
        }
    }
}

/// Flat JSON for a lookup: the result with unknown fields omitted, or an
/// error object carrying the URL.
pub fn lookup_to_json(url: &str, lookup: &PriceLookup) -> serde_json::Value {
    match lookup {
        PriceLookup::Found(result) => json!(result),
        PriceLookup::NotFound => json!({ "error": "Failed to scrape URL", "url": url }),
    }
}

// ── Test support ──────────────────────────────────────────────────────────────


#[cfg(test)]
mod tests {
    use super::mock::*;
    use super::*;

    fn api(fetcher: MockFetcher) -> PriceApi<MockFetcher> {
        PriceApi::with_fetcher(fetcher, "pricecharting.com")
    }

    #[tokio::test]
    async fn test_found_with_url_attached() {
        let api = api(MockFetcher::default().with_page(LATIAS_URL, &latias_page("$420.00")));

        let lookup = api.get_card_prices(LATIAS_URL).await;
        let result = lookup.found().expect("found");
        assert_eq!(result.url, LATIAS_URL);
        assert_eq!(result.card_name.as_deref(), Some("Latias ex #239"));
        assert_eq!(result.ungraded_price, Some(146.64));
        assert_eq!(result.psa10_price, Some(420.0));
    }

    #[tokio::test]
    async fn test_dash_psa10_is_partial_result() {
        let api = api(MockFetcher::default().with_page(LATIAS_URL, &latias_page("-")));

        let result = api.lookup(&PriceQuery::new(LATIAS_URL)).await.unwrap();
        assert_eq!(result.ungraded_price, Some(146.64));
        assert_eq!(result.psa10_price, None);
    }

    #[tokio::test]
    async fn test_unsupported_url_is_not_fetched() {
        let api = api(MockFetcher::default());

        for url in [
            "https://www.example.com/game/x/y",
            "https://pricecharting.com.evil.net/game/x",
            "ftp://www.pricecharting.com/game/x",
            "not a url",
        ] {
            assert_eq!(api.get_card_prices(url).await, PriceLookup::NotFound);
        }
        assert_eq!(api.fetcher.call_count(), 0);
    }

    #[tokio::test]
    async fn test_fetch_failures_are_not_found() {
        let api = api(MockFetcher::default().with_status(LATIAS_URL, 503));
        assert_eq!(api.get_card_prices(LATIAS_URL).await, PriceLookup::NotFound);

        let err = api.lookup(&PriceQuery::new(LATIAS_URL)).await.unwrap_err();
        assert!(matches!(err, ScrapeError::Status { .. }));

        let unreachable = "https://www.pricecharting.com/game/nowhere/0";
        assert_eq!(api.get_card_prices(unreachable).await, PriceLookup::NotFound);
    }

    #[test]
    fn test_unparseable_page_is_still_found() {
        let url = "https://pricecharting.com/game/a/b";
        let api = api(MockFetcher::default().with_page(url, "<html><body>maintenance</body></html>"));

        let lookup = tokio_test::block_on(api.get_card_prices(url));
        let result = lookup.found().expect("fetched page is reported");
        assert_eq!(result.url, url);
        assert_eq!(result.card_name, None);
        assert_eq!(result.ungraded_price, None);
        assert_eq!(result.psa10_price, None);
    }

    #[test]
    fn test_supported_hosts() {
        let api = api(MockFetcher::default());
        assert!(api.is_supported_url(LATIAS_URL));
        assert!(api.is_supported_url("http://PriceCharting.com/game/a"));
        assert!(api.is_supported_url("  https://pricecharting.com/game/a  "));
        assert!(!api.is_supported_url("https://notpricecharting.com/game/a"));
    }

    #[test]
    fn test_lookup_to_json() {
        let found = PriceLookup::Found(PriceResult {
            card_name: Some("Latias ex #239".into()),
            ungraded_price: Some(146.64),
            psa10_price: None,
            url: LATIAS_URL.into(),
        });
        let json = lookup_to_json(LATIAS_URL, &found);
        assert_eq!(json["card_name"], "Latias ex #239");
        assert!(json.get("psa10_price").is_none());

        let json = lookup_to_json(LATIAS_URL, &PriceLookup::NotFound);
        assert_eq!(json["error"], "Failed to scrape URL");
        assert_eq!(json["url"], LATIAS_URL);
    }
}
