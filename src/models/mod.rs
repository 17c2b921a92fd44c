use serde::{Serialize, Serializer};

use crate::utils::fmt_price;

// ── Lookup input ──────────────────────────────────────────────────────────────

/// One product page to price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceQuery {
    pub url: String,
}

impl PriceQuery {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

// ── Extracted prices ──────────────────────────────────────────────────────────

/// What the extractor finds on a page. `None` means unknown, not zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CardPrices {
    pub card_name: Option<String>,
    pub ungraded_price: Option<f64>,
    pub psa10_price: Option<f64>,
}

impl CardPrices {
    pub fn with_url(self, url: impl Into<String>) -> PriceResult {
        PriceResult {
            url: url.into(),
            card_name: self.card_name,
            ungraded_price: self.ungraded_price,
            psa10_price: self.psa10_price,
        }
    }
}

/// A fetched page's prices, tagged with the URL it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ungraded_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub psa10_price: Option<f64>,
    pub url: String,
}

/// Outcome of a single-URL lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum PriceLookup {
    Found(PriceResult),
    NotFound,
}

impl PriceLookup {
    pub fn found(&self) -> Option<&PriceResult> {
        match self {
            PriceLookup::Found(r) => Some(r),
            PriceLookup::NotFound => None,
        }
    }
}

// ── Batch rows ────────────────────────────────────────────────────────────────

/// Raw cell from the URL column. `None` when the row is too short.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputRow {
    pub url: Option<String>,
}

/// Output CSV: link, name, ungraded_price, psa10_price
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OutputRow {
    pub link: String,
    pub name: Option<String>,
    #[serde(serialize_with = "serialize_price")]
    pub ungraded_price: Option<f64>,
    #[serde(serialize_with = "serialize_price")]
    pub psa10_price: Option<f64>,
}

impl OutputRow {
    /// A row with every derived field blank.
    pub fn blank(link: impl Into<String>) -> Self {
        Self {
            link: link.into(),
            ..Default::default()
        }
    }

    pub fn from_lookup(link: &str, lookup: &PriceLookup) -> Self {
        match lookup {
            PriceLookup::Found(r) => Self {
                link: link.to_string(),
                name: r.card_name.clone(),
                ungraded_price: r.ungraded_price,
                psa10_price: r.psa10_price,
            },
            PriceLookup::NotFound => Self::blank(link),
        }
    }
}

fn serialize_price<S: Serializer>(price: &Option<f64>, s: S) -> Result<S::Ok, S::Error> {
    match price {
        Some(p) => s.serialize_str(&fmt_price(*p)),
        None => s.serialize_none(),
    }
}

// ── Batch summary ─────────────────────────────────────────────────────────────

/// Running counts for a batch. Advisory only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchStats {
    pub total: usize,
    /// Rows that went through the lookup.
    pub attempted: usize,
    /// Lookups that produced a card name.
    pub succeeded: usize,
    pub failed: usize,
    /// Rows with no URL; not attempted.
    pub skipped: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_json_omits_unknown_fields() {
        let result = CardPrices {
            card_name: Some("Latias ex #239".into()),
            ungraded_price: Some(146.64),
            psa10_price: None,
        }
        .with_url("https://www.pricecharting.com/game/x/y");

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["card_name"], "Latias ex #239");
        assert_eq!(json["ungraded_price"], 146.64);
        assert!(json.get("psa10_price").is_none());
        assert_eq!(json["url"], "https://www.pricecharting.com/game/x/y");
    }

    #[test]
    fn test_output_row_from_not_found_is_blank() {
        let row = OutputRow::from_lookup("https://a", &PriceLookup::NotFound);
        assert_eq!(row, OutputRow::blank("https://a"));
        assert!(row.name.is_none());
    }
}
