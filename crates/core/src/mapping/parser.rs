use chartfeed_market_data::InstrumentId;
use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use log::{debug, warn};

use super::{InstrumentMapping, InstrumentRecord, MappingError};

pub const SYMBOL_COLUMN: &str = "Stock Name";
pub const INSTRUMENT_ID_COLUMN: &str = "Instrument ID";
pub const MARKET_CAP_COLUMN: &str = "Market Cap";
pub const SETUP_TAG_COLUMN: &str = "Setup_Case";

pub const REQUIRED_COLUMNS: [&str; 4] = [
    SYMBOL_COLUMN,
    INSTRUMENT_ID_COLUMN,
    MARKET_CAP_COLUMN,
    SETUP_TAG_COLUMN,
];

/// Parse a mapping table.
///
/// All four [`REQUIRED_COLUMNS`] must be present, otherwise the whole table is
/// rejected. Rows with an empty field, a non-integral or non-positive
/// instrument id, or a negative market cap are dropped. Extra columns are
/// ignored.
pub fn parse_mapping(bytes: &[u8]) -> Result<InstrumentMapping, MappingError> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(bytes);

    let headers = reader.headers()?.clone();
    let mut indexes = [0usize; 4];
    let mut missing = Vec::new();
    for (slot, column) in indexes.iter_mut().zip(REQUIRED_COLUMNS) {
        match headers.iter().position(|h| h == column) {
            Some(i) => *slot = i,
            None => missing.push(column.to_string()),
        }
    }
    if !missing.is_empty() {
        return Err(MappingError::MissingColumns(missing));
    }

    let mut records = Vec::new();
    let mut dropped = 0usize;
    for (line, row) in reader.records().enumerate() {
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                debug!("Dropping unreadable mapping row {}: {}", line + 2, e);
                dropped += 1;
                continue;
            }
        };
        match parse_row(&row, &indexes) {
            Some(record) => records.push(record),
            None => {
                debug!("Dropping invalid mapping row {}: {:?}", line + 2, row);
                dropped += 1;
            }
        }
    }

    let (mapping, duplicates) = InstrumentMapping::from_records(records);
    if dropped + duplicates > 0 {
        warn!(
            "Mapping table: dropped {} invalid and {} duplicate rows, kept {}",
            dropped,
            duplicates,
            mapping.len()
        );
    }
    Ok(mapping)
}

fn parse_row(row: &StringRecord, indexes: &[usize; 4]) -> Option<InstrumentRecord> {
    let field = |i: usize| row.get(indexes[i]).filter(|v| !v.is_empty());

    let symbol = field(0)?;
    let instrument_id = parse_instrument_id(field(1)?)?;
    let market_cap: f64 = field(2)?.parse().ok()?;
    if !market_cap.is_finite() || market_cap < 0.0 {
        return None;
    }
    let setup_tag = field(3)?;

    Some(InstrumentRecord::new(
        symbol,
        instrument_id,
        market_cap,
        setup_tag,
    ))
}

/// Accept integers and integral floats ("1333", "1333.0"); ids are positive.
fn parse_instrument_id(raw: &str) -> Option<InstrumentId> {
    if let Ok(id) = raw.parse::<InstrumentId>() {
        return (id > 0).then_some(id);
    }
    let value: f64 = raw.parse().ok()?;
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0; // 2^53
    if value.is_finite() && value.fract() == 0.0 && value > 0.0 && value <= MAX_EXACT {
        Some(value as InstrumentId)
    } else {
        None
    }
}

/// Serialize a mapping back to the table layout [`parse_mapping`] reads.
pub fn write_mapping(mapping: &InstrumentMapping) -> Result<Vec<u8>, MappingError> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(REQUIRED_COLUMNS)?;
    for record in mapping.records() {
        let instrument_id = record.instrument_id.to_string();
        let market_cap = record.market_cap.to_string();
        writer.write_record([
            record.symbol.as_str(),
            instrument_id.as_str(),
            market_cap.as_str(),
            record.setup_tag.as_str(),
        ])?;
    }
    writer
        .into_inner()
        .map_err(|e| MappingError::Csv(csv::Error::from(e.into_error())))
}
