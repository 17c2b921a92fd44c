use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

use card_pricer::config::AppConfig;
use card_pricer::loader::{read_input_rows, write_output_rows};
use card_pricer::pipeline::{BatchRunner, LogProgress};
use card_pricer::scraper::{PriceApi, lookup_to_json};
use card_pricer::utils::{self, fmt_dollars};

#[derive(Parser)]
#[command(name = "card-pricer", about = "PriceCharting card price scraper", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Skip TLS certificate verification
    #[arg(long, global = true)]
    insecure: bool,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,
}

#[derive(Subcommand)]
enum Command {
    /// Look up a single PriceCharting product page
    Price {
        /// e.g. https://www.pricecharting.com/game/pokemon-surging-sparks/latias-ex-239
        url: String,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Scrape every URL in a CSV file and write the prices to another
    Batch {
        /// CSV file with a header row and a URL column
        input: PathBuf,

        /// Output CSV (link, name, ungraded_price, psa10_price)
        output: PathBuf,

        /// Column holding the URLs (default: url)
        #[arg(short, long)]
        column: Option<String>,

        /// Seconds to wait between requests (default: 1.0); zero or
        /// negative means no pause
        #[arg(short, long, allow_negative_numbers = true)]
        delay: Option<f64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "card_pricer=info,warn",
        1 => "card_pricer=debug,info",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    let mut config = AppConfig::load()?;
    if cli.insecure {
        config.scraper.accept_invalid_certs = true;
    }
    if let Some(secs) = cli.timeout {
        config.scraper.timeout_secs = secs;
    }

    match cli.command {
        Command::Price { url, json } => {
            let api = PriceApi::new(&config.scraper).context("Failed to build HTTP client")?;
            if !api.is_supported_url(&url) {
                bail!("Please provide a valid {} URL, got {}", config.scraper.site_host, url);
            }

            info!("Fetching card pricing information...");
            let lookup = api.get_card_prices(&url).await;

            if json {
                println!("{}", serde_json::to_string_pretty(&lookup_to_json(&url, &lookup))?);
            }
            let Some(result) = lookup.found() else {
                bail!("Failed to scrape {}", url);
            };
            if !json {
                println!("Card Name: {}", result.card_name.as_deref().unwrap_or("Not found"));
                println!("Ungraded Price: {}", fmt_dollars(result.ungraded_price));
                println!("PSA 10 Price: {}", fmt_dollars(result.psa10_price));
            }
        }

        Command::Batch { input, output, column, delay } => {
            if let Some(column) = column {
                config.batch.url_column = column;
            }
            if let Some(delay) = delay {
                config.batch.delay_secs = delay;
            }

            let rows = read_input_rows(&input, &config.batch.url_column)
                .with_context(|| format!("Cannot read input {:?}", input))?;

            // Fail before scraping rather than after.
            std::fs::File::create(&output)
                .with_context(|| format!("Cannot write output {:?}", output))?;

            let api = PriceApi::new(&config.scraper).context("Failed to build HTTP client")?;

            let report = {
                let _t = utils::Timer::start("Batch run");
                BatchRunner::new(&api, config.batch.delay())
                    .run(&rows, &mut LogProgress::default())
                    .await
            };

            write_output_rows(&output, &report.rows)
                .with_context(|| format!("Cannot write output {:?}", output))?;
            info!("Output saved to {:?}", output);
        }
    }

    Ok(())
}
