use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Top-level application configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub scraper: ScraperConfig,
    #[serde(default)]
    pub batch: BatchConfig,
}

/// Scraper configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScraperConfig {
    /// Host the lookup accepts URLs for; subdomains are accepted too.
    #[serde(default = "default_site_host")]
    pub site_host: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Skip TLS certificate verification. Off unless asked for.
    #[serde(default)]
    pub accept_invalid_certs: bool,
}

/// Batch run configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BatchConfig {
    #[serde(default = "default_delay_secs")]
    pub delay_secs: f64,

    #[serde(default = "default_url_column")]
    pub url_column: String,
}

// ── Defaults ─────────────────────────────────────────────────────────────────

fn default_site_host() -> String {
    "pricecharting.com".to_string()
}
fn default_timeout_secs() -> u64 {
    10
}
fn default_user_agent() -> String {
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36"
        .to_string()
}
fn default_delay_secs() -> f64 {
    1.0
}
fn default_url_column() -> String {
    "url".to_string()
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            site_host: default_site_host(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            accept_invalid_certs: false,
        }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            delay_secs: default_delay_secs(),
            url_column: default_url_column(),
        }
    }
}

impl BatchConfig {
    /// Pause between rows. Negative or non-finite values mean no pause.
    pub fn delay(&self) -> Duration {
        Duration::try_from_secs_f64(self.delay_secs).unwrap_or(Duration::ZERO)
    }
}

// ── Loader ───────────────────────────────────────────────────────────────────

impl AppConfig {
    /// Load configuration from file + environment overrides
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();

        let cfg = config::Config::builder()
            .add_source(
                config::File::with_name("config/default")
                    .required(false)
                    .format(config::FileFormat::Toml),
            )
            .add_source(
                config::File::with_name("config/local")
                    .required(false)
                    .format(config::FileFormat::Toml),
            )
            .add_source(
                config::Environment::with_prefix("CARD_PRICER")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to read configuration")?;

        cfg.try_deserialize()
            .context("Invalid configuration values")
    }
}
