// ── Prices ────────────────────────────────────────────────────────────────────

/// Parse price: strip everything except digits and dot.
/// "$1,234.56" → 1234.56 | "420.00" → 420.0 | "-" → None
pub fn parse_price(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() || s == "N/A" || s == "-" || s == "—" {
        return None;
    }
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    let price: f64 = cleaned.parse().ok()?;
    if price.is_finite() && price >= 0.0 { Some(price) } else { None }
}

/// First price-looking value in a cell.
///
/// PriceCharting cells carry the price followed by a change indicator
/// ("$146.64 +$1.20"), so the first `$` amount wins. Cells without a `$`
/// are accepted only when they are a bare number.
pub fn first_price(text: &str) -> Option<f64> {
    let text = text.trim();

    if let Some(idx) = text.find('$') {
        let amount: String = text[idx + 1..]
            .chars()
            .skip_while(|c| c.is_whitespace())
            .take_while(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
            .collect();
        return parse_price(&amount);
    }

    let bare_number = text.chars().any(|c| c.is_ascii_digit())
        && text
            .chars()
            .all(|c| c.is_ascii_digit() || c == ',' || c == '.' || c.is_whitespace());
    if bare_number { parse_price(text) } else { None }
}

// ── Card names ────────────────────────────────────────────────────────────────

/// Category text PriceCharting appends after the card name in headings,
/// e.g. "Latias ex #239 Pokemon Surging Sparks".
const CATEGORY_MARKERS: &[&str] = &["Pokemon"];

/// Collapse runs of whitespace (including newlines) into single spaces.
pub fn normalise_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Card name from the `<h1>` text.
pub fn clean_heading(raw: &str) -> Option<String> {
    non_empty(strip_category(&normalise_whitespace(raw)))
}

/// Card name from the `<title>` text.
/// "Latias ex #239 Prices | Pokemon Surging Sparks | Pokemon Cards" → "Latias ex #239"
pub fn clean_title(raw: &str) -> Option<String> {
    let text = normalise_whitespace(raw);
    let head = text.split('|').next().unwrap_or_default().trim();
    let head = head.strip_suffix(" Prices").unwrap_or(head);
    non_empty(strip_category(head))
}

/// Cut at the first category marker that leaves a non-empty name.
fn strip_category(text: &str) -> String {
    for marker in CATEGORY_MARKERS {
        for (idx, _) in text.match_indices(marker) {
            let head = text[..idx].trim();
            if !head.is_empty() {
                return head.to_string();
            }
        }
    }
    text.trim().to_string()
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() { None } else { Some(s) }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
