//! Batch driver: URLs in, one price row out per URL.
//!
//! Rows are processed strictly one after another, in input order, with a
//! fixed pause between lookups. A failed row becomes a blank row and the run
//! carries on; nothing here is retried.

use crate::models::{BatchStats, InputRow, OutputRow, PriceLookup};
use crate::scraper::{PageFetcher, PriceApi};
use crate::utils::fmt_dollars;
use std::time::Duration;
use tracing::{info, warn};

// ── Progress ──────────────────────────────────────────────────────────────────

/// Progress sink for a batch run.
pub trait BatchProgress {
    /// Called once with the number of rows.
    fn begin(&mut self, _total: usize) {}

    /// Called after each row with the running counts.
    fn row_done(&mut self, _index: usize, _row: &OutputRow, _stats: &BatchStats) {}

    fn finish(&mut self, _stats: &BatchStats) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl BatchProgress for NullProgress {}

/// Logs one line per row and a summary at the end.
#[derive(Default)]
pub struct LogProgress {
    total: usize,
}

impl BatchProgress for LogProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
        info!("📋 Found {} URLs to process", total);
    }

    fn row_done(&mut self, index: usize, row: &OutputRow, stats: &BatchStats) {
        let pos = format!("[{}/{}]", index + 1, self.total);
        match &row.name {
            Some(name) => info!(
                "{} ✅ {}: {} / {}",
                pos,
                name,
                fmt_dollars(row.ungraded_price),
                fmt_dollars(row.psa10_price)
            ),
            None if row.link.is_empty() => info!("{} ⚠️  No URL in row", pos),
            None => info!("{} ❌ Failed to scrape: {}", pos, row.link),
        }
        info!(
            "{} ok={} failed={} skipped={}",
            pos, stats.succeeded, stats.failed, stats.skipped
        );
    }

    fn finish(&mut self, stats: &BatchStats) {
        info!(
            "📊 Processing complete: {} rows | {} attempted | {} successful | {} failed | {} skipped",
            stats.total, stats.attempted, stats.succeeded, stats.failed, stats.skipped
        );
    }
}

// ── Runner ────────────────────────────────────────────────────────────────────

pub struct BatchRunner<'a, F> {
    api: &'a PriceApi<F>,
    delay: Duration,
}

#[derive(Debug)]
pub struct BatchReport {
    pub rows: Vec<OutputRow>,
    pub stats: BatchStats,
}

impl<'a, F: PageFetcher> BatchRunner<'a, F> {
    pub fn new(api: &'a PriceApi<F>, delay: Duration) -> Self {
        Self { api, delay }
    }

    /// Look up every row in order. Output row `i` always belongs to input
    /// row `i`.
    pub async fn run(&self, rows: &[InputRow], progress: &mut dyn BatchProgress) -> BatchReport {
        let mut stats = BatchStats {
            total: rows.len(),
            ..Default::default()
        };
        let mut out = Vec::with_capacity(rows.len());

        progress.begin(rows.len());
        if !rows.is_empty() {
            info!("⏱️  Using {:?} delay between requests", self.delay);
        }

        for (i, input) in rows.iter().enumerate() {
            let row = self.process_row(input, &mut stats).await;
            progress.row_done(i, &row, &stats);
            out.push(row);

            if i + 1 < rows.len() && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
        }

        progress.finish(&stats);
        BatchReport { rows: out, stats }
    }

    async fn process_row(&self, input: &InputRow, stats: &mut BatchStats) -> OutputRow {
        let url = input.url.as_deref().unwrap_or_default().trim();
        if url.is_empty() {
            stats.skipped += 1;
            return OutputRow::blank(input.url.clone().unwrap_or_default());
        }

        stats.attempted += 1;
        let lookup = self.api.get_card_prices(url).await;

        match &lookup {
            PriceLookup::Found(r) if r.card_name.is_some() => stats.succeeded += 1,
            PriceLookup::Found(_) => {
                warn!("{}: page fetched but no card name found", url);
                stats.failed += 1;
            }
            PriceLookup::NotFound => stats.failed += 1,
        }

        OutputRow::from_lookup(url, &lookup)
    }
}
