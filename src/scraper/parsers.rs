use crate::models::CardPrices;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use super::cleaner::{clean_heading, clean_title, first_price, normalise_whitespace};

pub const UNGRADED: &str = "Ungraded";
pub const PSA_10: &str = "PSA 10";

// ── Product page ──────────────────────────────────────────────────────────────

/// Pull the card name and the two grade prices out of a product page.
///
/// Never fails: anything that cannot be found comes back as `None`.
pub fn extract(html: &str) -> CardPrices {
    if html.trim().is_empty() {
        return CardPrices::default();
    }

    let doc = Html::parse_document(html);

    let prices = CardPrices {
        card_name: parse_card_name(&doc),
        ungraded_price: parse_grade_price(&doc, UNGRADED),
        psa10_price: parse_grade_price(&doc, PSA_10),
    };
    debug!(
        "extracted name={:?} ungraded={:?} psa10={:?}",
        prices.card_name, prices.ungraded_price, prices.psa10_price
    );
    prices
}

/// `<h1>` first, `<title>` as a fallback.
fn parse_card_name(doc: &Html) -> Option<String> {
    if let Some(h1) = first_text(doc, "h1") {
        if let Some(name) = clean_heading(&h1) {
            return Some(name);
        }
    }
    first_text(doc, "title").and_then(|t| clean_title(&t))
}

fn first_text(doc: &Html, selector: &str) -> Option<String> {
    let Ok(sel) = Selector::parse(selector) else { return None };
    doc.select(&sel).next().map(|el| element_text(&el))
}

// ── Pricing tables ────────────────────────────────────────────────────────────

/// Price for one grade column, found by its label rather than by position:
/// the comparison table (labels in the header row, prices in the row below)
/// is tried first, then the price guide table (label in the first cell).
pub fn parse_grade_price(doc: &Html, grade: &str) -> Option<f64> {
    let Ok(table_sel) = Selector::parse("table") else { return None };
    let tables: Vec<Vec<Vec<String>>> = doc.select(&table_sel).map(|t| table_rows(&t)).collect();

    tables
        .iter()
        .find_map(|rows| comparison_price(rows, grade))
        .or_else(|| tables.iter().find_map(|rows| guide_price(rows, grade)))
}

/// Header row holds the grade names, the next row holds the prices.
fn comparison_price(rows: &[Vec<String>], grade: &str) -> Option<f64> {
    let [header, prices, ..] = rows else { return None };
    let grade = grade.to_lowercase();

    header
        .iter()
        .enumerate()
        .filter(|(_, label)| first_price(label).is_none() && label.to_lowercase().contains(&grade))
        .find_map(|(i, _)| prices.get(i).and_then(|cell| first_price(cell)))
}

/// Label/price pairs anywhere in a row: a cell equal to the grade followed
/// by a price cell, or one `Grade $price` cell.
fn guide_price(rows: &[Vec<String>], grade: &str) -> Option<f64> {
    rows.iter().find_map(|cells| {
        cells.iter().enumerate().find_map(|(i, cell)| {
            if cell.eq_ignore_ascii_case(grade) {
                return cells.get(i + 1).and_then(|next| first_price(next));
            }
            labelled_price(cell, grade)
        })
    })
}

/// "PSA 10 $420.00" → 420.0 for grade "PSA 10".
fn labelled_price(cell: &str, grade: &str) -> Option<f64> {
    let head = cell.get(..grade.len())?;
    if !head.eq_ignore_ascii_case(grade) {
        return None;
    }
    let tail = &cell[grade.len()..];
    if tail.starts_with(|c: char| c.is_whitespace() || c == '$') {
        first_price(tail)
    } else {
        None
    }
}

/// Text of every direct `td`/`th` of every row in a table.
fn table_rows(table: &ElementRef) -> Vec<Vec<String>> {
    let Ok(tr_sel) = Selector::parse("tr") else { return vec![] };

    table
        .select(&tr_sel)
        .map(|tr| {
            tr.children()
                .filter_map(ElementRef::wrap)
                .filter(|el| matches!(el.value().name(), "td" | "th"))
                .map(|el| element_text(&el))
                .collect::<Vec<_>>()
        })
        .filter(|cells| !cells.is_empty())
        .collect()
}

fn element_text(el: &ElementRef) -> String {
    normalise_whitespace(&el.text().collect::<Vec<_>>().join(" "))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
