//! CSV input of product URLs and CSV output of scraped prices.

use crate::error::InputError;
use crate::models::{InputRow, OutputRow};
use std::io;
use std::path::Path;
use tracing::{debug, info, warn};

pub const OUTPUT_HEADER: [&str; 4] = ["link", "name", "ungraded_price", "psa10_price"];

/// Read the URL column of a CSV file, one `InputRow` per data row.
///
/// The column is checked against the header up front; a missing column is
/// an error before any row is read.
pub fn read_input_rows(path: &Path, url_column: &str) -> Result<Vec<InputRow>, InputError> {
    if !path.exists() {
        return Err(InputError::NotFound(path.to_path_buf()));
    }

    debug!("Loading URLs from {:?} (column '{}')", path, url_column);
    let file = std::fs::File::open(path)?;
    let rows = read_input_from(file, url_column)?;

    info!("{} rows loaded from {:?}", rows.len(), path);
    Ok(rows)
}

/// Same as `read_input_rows`, from any reader.
///
/// A blank line is an empty URL cell, not a missing row: it comes back as an
/// empty row so output row `i` stays aligned with input row `i`. Blank lines
/// before the header or after the last record are ignored.
pub fn read_input_from<R: io::Read>(mut rdr: R, url_column: &str) -> Result<Vec<InputRow>, InputError> {
    let mut raw = Vec::new();
    rdr.read_to_end(&mut raw)?;
    let data = keep_blank_lines(&raw);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(data.as_slice());

    let headers = reader.headers()?.clone();
    let Some(idx) = headers.iter().position(|h| h.trim() == url_column) else {
        return Err(InputError::MissingColumn {
            column: url_column.to_string(),
            available: headers.iter().map(str::trim).collect::<Vec<_>>().join(", "),
        });
    };

    let mut rows = Vec::new();
    let mut record = csv::ByteRecord::new();
    while reader.read_byte_record(&mut record)? {
        let url = record
            .get(idx)
            .map(|cell| String::from_utf8_lossy(cell).trim().to_string());
        if url.is_none() {
            warn!("Row {}: no '{}' column", rows.len() + 1, url_column);
        }
        rows.push(InputRow { url });
    }

    Ok(rows)
}

/// The csv reader skips empty lines. Turn each one (outside quoted fields)
/// into a `""` record so it is read as a row with one empty cell.
fn keep_blank_lines(raw: &[u8]) -> Vec<u8> {
    let is_eol = |b: &u8| matches!(*b, b'\n' | b'\r');
    let start = raw.iter().position(|b| !is_eol(b)).unwrap_or(raw.len());
    let end = raw.iter().rposition(|b| !is_eol(b)).map_or(start, |i| i + 1);
    let raw = &raw[start..end];

    let mut out = Vec::with_capacity(raw.len() + 16);
    let mut in_quotes = false;
    let mut line_start = true;

    for (i, &b) in raw.iter().enumerate() {
        if b == b'"' {
            in_quotes = !in_quotes;
        }
        if line_start && !in_quotes && is_eol(&b) {
            debug!("blank input line at byte {}", start + i);
            out.extend_from_slice(b"\"\"");
        }
        out.push(b);
        line_start = !in_quotes && (b == b'\n' || (b == b'\r' && raw.get(i + 1) != Some(&b'\n')));
    }
    if !out.is_empty() {
        out.push(b'\n');
    }
    out
}

/// Write the output CSV. The header is written even with no rows.
pub fn write_output_rows(path: &Path, rows: &[OutputRow]) -> Result<(), InputError> {
    let file = std::fs::File::create(path)?;
    write_output_to(file, rows)?;
    info!("{} rows written to {:?}", rows.len(), path);
    Ok(())
}

pub fn write_output_to<W: io::Write>(wtr: W, rows: &[OutputRow]) -> Result<(), InputError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(wtr);

    writer.write_record(OUTPUT_HEADER)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}
