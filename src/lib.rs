//! Card prices from PriceCharting product pages: one URL at a time, or a
//! whole CSV of URLs with a fixed pause between requests.

pub mod config;
pub mod error;
pub mod loader;
pub mod models;
pub mod pipeline;
pub mod scraper;
pub mod utils;

pub use crate::models::{CardPrices, PriceLookup, PriceQuery, PriceResult};
pub use crate::scraper::PriceApi;
pub use crate::scraper::parsers::extract;
