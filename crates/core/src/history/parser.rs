use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord, Trim};

use super::{HistoricalBar, SeriesParseError};

pub const REQUIRED_COLUMNS: [&str; 6] = ["date", "open", "high", "low", "close", "volume"];

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

/// Parse a date cell into unix seconds. Values without an offset are UTC.
pub fn parse_timestamp(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.timestamp());
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt.and_utc().timestamp());
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc().timestamp());
        }
    }
    None
}

/// Parse a historical series.
///
/// Column names are matched case-insensitively. Rows with an unparseable
/// date, a missing or non-numeric value, or a negative volume are dropped.
/// The result is sorted by timestamp; for repeated timestamps the first row
/// in the file wins.
pub fn parse_series(bytes: &[u8]) -> Result<Vec<HistoricalBar>, SeriesParseError> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.to_lowercase())
        .collect();
    let mut indexes = [0usize; 6];
    let mut missing = Vec::new();
    for (slot, column) in indexes.iter_mut().zip(REQUIRED_COLUMNS) {
        match headers.iter().position(|h| h == column) {
            Some(i) => *slot = i,
            None => missing.push(column.to_string()),
        }
    }
    if !missing.is_empty() {
        return Err(SeriesParseError::MissingColumns(missing));
    }

    let mut bars: Vec<HistoricalBar> = reader
        .records()
        .filter_map(|row| row.ok())
        .filter_map(|row| parse_row(&row, &indexes))
        .collect();

    // Stable sort keeps file order among equal timestamps
    bars.sort_by_key(|bar| bar.timestamp);
    bars.dedup_by_key(|bar| bar.timestamp);
    Ok(bars)
}

fn parse_row(row: &StringRecord, indexes: &[usize; 6]) -> Option<HistoricalBar> {
    let number = |i: usize| -> Option<f64> {
        let value: f64 = row.get(indexes[i])?.parse().ok()?;
        value.is_finite().then_some(value)
    };

    let timestamp = parse_timestamp(row.get(indexes[0])?)?;
    let volume = number(5)?;
    if volume < 0.0 {
        return None;
    }

    Some(HistoricalBar {
        timestamp,
        open: number(1)?,
        high: number(2)?,
        low: number(3)?,
        close: number(4)?,
        volume,
    })
}
