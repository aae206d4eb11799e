use std::collections::HashMap;

use chartfeed_market_data::InstrumentId;
use serde::{Deserialize, Serialize};

/// One row of the mapping table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentRecord {
    pub symbol: String,
    pub instrument_id: InstrumentId,
    pub market_cap: f64,
    pub setup_tag: String,
}

impl InstrumentRecord {
    pub fn new(
        symbol: impl Into<String>,
        instrument_id: InstrumentId,
        market_cap: f64,
        setup_tag: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            instrument_id,
            market_cap,
            setup_tag: setup_tag.into(),
        }
    }
}

/// Normalized form used for symbol lookups.
pub fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}

/// Immutable snapshot of the mapping table.
///
/// Symbols and instrument ids are unique. A reload builds a new snapshot
/// instead of mutating this one.
#[derive(Debug, Clone, Default)]
pub struct InstrumentMapping {
    records: Vec<InstrumentRecord>,
    by_symbol: HashMap<String, usize>,
    by_id: HashMap<InstrumentId, usize>,
}

impl InstrumentMapping {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a snapshot, keeping the first record for any repeated symbol or id.
    ///
    /// Returns the snapshot and the number of records dropped as duplicates.
    pub fn from_records(records: impl IntoIterator<Item = InstrumentRecord>) -> (Self, usize) {
        let mut mapping = Self::default();
        let mut duplicates = 0;
        for record in records {
            let symbol_key = normalize_symbol(&record.symbol);
            if mapping.by_symbol.contains_key(&symbol_key)
                || mapping.by_id.contains_key(&record.instrument_id)
            {
                duplicates += 1;
                continue;
            }
            let index = mapping.records.len();
            mapping.by_symbol.insert(symbol_key, index);
            mapping.by_id.insert(record.instrument_id, index);
            mapping.records.push(record);
        }
        (mapping, duplicates)
    }

    /// Built-in mapping used to seed an empty bucket.
    pub fn sample() -> Self {
        let rows = [
            ("RELIANCE", 2885, 1_950_000.0, "Case1"),
            ("TCS", 11536, 1_400_000.0, "Case1"),
            ("HDFCBANK", 1333, 1_250_000.0, "Case2"),
            ("ICICIBANK", 4963, 880_000.0, "Case2"),
            ("INFY", 1594, 760_000.0, "Case1"),
            ("SBIN", 3045, 720_000.0, "Case3"),
            ("ITC", 1660, 540_000.0, "Case3"),
            ("LT", 11483, 500_000.0, "Case2"),
        ];
        let (mapping, _) = Self::from_records(
            rows.into_iter()
                .map(|(symbol, id, cap, tag)| InstrumentRecord::new(symbol, id, cap, tag)),
        );
        mapping
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn records(&self) -> &[InstrumentRecord] {
        &self.records
    }

    /// Instrument ids in table order.
    pub fn instrument_ids(&self) -> Vec<InstrumentId> {
        self.records.iter().map(|r| r.instrument_id).collect()
    }

    /// Case- and whitespace-insensitive symbol lookup.
    pub fn get_by_symbol(&self, symbol: &str) -> Option<&InstrumentRecord> {
        self.by_symbol
            .get(&normalize_symbol(symbol))
            .map(|&i| &self.records[i])
    }

    pub fn get_by_id(&self, instrument_id: InstrumentId) -> Option<&InstrumentRecord> {
        self.by_id.get(&instrument_id).map(|&i| &self.records[i])
    }

    pub fn contains_id(&self, instrument_id: InstrumentId) -> bool {
        self.by_id.contains_key(&instrument_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicates_keep_first() {
        let (mapping, dropped) = InstrumentMapping::from_records(vec![
            InstrumentRecord::new("ACME", 1, 10.0, "A"),
            InstrumentRecord::new("acme ", 2, 20.0, "B"),
            InstrumentRecord::new("OTHER", 1, 30.0, "C"),
            InstrumentRecord::new("THIRD", 3, 40.0, "D"),
        ]);

        assert_eq!(dropped, 2);
        assert_eq!(mapping.instrument_ids(), vec![1, 3]);
        assert_eq!(mapping.get_by_symbol("Acme").unwrap().setup_tag, "A");
        assert_eq!(mapping.get_by_id(3).unwrap().symbol, "THIRD");
    }

    #[test]
    fn test_lookup_normalizes_symbol() {
        let mapping = InstrumentMapping::sample();
        assert_eq!(
            mapping.get_by_symbol("  hdfcbank ").map(|r| r.instrument_id),
            Some(1333)
        );
        assert!(mapping.get_by_symbol("NOPE").is_none());
    }

    #[test]
    fn test_sample_is_valid() {
        let mapping = InstrumentMapping::sample();
        assert!(!mapping.is_empty());
        assert!(mapping
            .records()
            .iter()
            .all(|r| r.instrument_id > 0 && r.market_cap >= 0.0));
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let json = serde_json::to_value(InstrumentRecord::new("TCS", 11536, 1.5, "Case1")).unwrap();
        assert_eq!(json["instrumentId"], 11536);
        assert_eq!(json["marketCap"], 1.5);
        assert_eq!(json["setupTag"], "Case1");
    }
}
