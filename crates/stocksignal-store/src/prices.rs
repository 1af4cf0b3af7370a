//! Loader for the priced dataset (`ticker,priorClose,current`).

use std::path::Path;
use std::str::FromStr;

use rust_decimal::Decimal;
use stocksignal_core::PriceQuote;

use crate::error::StoreError;

const BOM: char = '\u{feff}';

/// Parse a price cell. Thousands separators (`,`) are ignored.
///
/// A blank cell is `None`. A malformed cell is also `None`, with a warning.
#[must_use]
pub fn parse_price(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let cleaned: String = trimmed.chars().filter(|c| *c != ',').collect();
    match Decimal::from_str(&cleaned) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(value = trimmed, error = %e, "malformed price cell; treating as missing");
            None
        }
    }
}

fn column_index(headers: &csv::StringRecord, name: &str, path: &Path) -> Result<usize, StoreError> {
    headers
        .iter()
        .position(|h| h.trim_start_matches(BOM).trim().eq_ignore_ascii_case(name))
        .ok_or_else(|| StoreError::MissingColumn {
            path: path.to_path_buf(),
            column: name.to_string(),
        })
}

/// Load price quotes from a CSV file with `ticker`, `priorClose` and
/// `current` columns (any order, extra columns ignored).
///
/// Rows with a blank ticker are skipped. Tickers are upper-cased.
///
/// # Errors
///
/// Returns [`StoreError`] if the file cannot be read, is not valid CSV, or
/// lacks one of the required columns.
pub fn load_price_quotes(path: &Path) -> Result<Vec<PriceQuote>, StoreError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| StoreError::csv(path, e))?;

    let headers = reader.headers().map_err(|e| StoreError::csv(path, e))?.clone();
    let ticker_idx = column_index(&headers, "ticker", path)?;
    let prior_idx = column_index(&headers, "priorClose", path)?;
    let current_idx = column_index(&headers, "current", path)?;

    let mut quotes = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| StoreError::csv(path, e))?;
        let ticker = record.get(ticker_idx).unwrap_or_default().trim().to_uppercase();
        if ticker.is_empty() {
            continue;
        }
        quotes.push(PriceQuote {
            ticker,
            prior_close: record.get(prior_idx).and_then(parse_price),
            current_price: record.get(current_idx).and_then(parse_price),
        });
    }

    tracing::debug!(path = %path.display(), quotes = quotes.len(), "loaded price quotes");
    Ok(quotes)
}
