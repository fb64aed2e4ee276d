use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One daily row as delivered by a provider. `None` marks a missing value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawBar {
    pub date: NaiveDate,
    pub open: Option<Decimal>,
    pub high: Option<Decimal>,
    pub low: Option<Decimal>,
    pub close: Option<Decimal>,
    pub volume: Option<Decimal>,
}

impl RawBar {
    /// A bar with every column present.
    pub fn complete(
        date: NaiveDate,
        open: Decimal,
        high: Decimal,
        low: Decimal,
        close: Decimal,
        volume: Decimal,
    ) -> Self {
        Self {
            date,
            open: Some(open),
            high: Some(high),
            low: Some(low),
            close: Some(close),
            volume: Some(volume),
        }
    }

    pub fn has_missing(&self) -> bool {
        self.open.is_none()
            || self.high.is_none()
            || self.low.is_none()
            || self.close.is_none()
            || self.volume.is_none()
    }
}

/// Daily rows grouped by ticker, in the order the provider returned them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawPriceTable {
    bars: HashMap<String, Vec<RawBar>>,
}

impl RawPriceTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, ticker: impl Into<String>, bars: Vec<RawBar>) {
        self.bars.insert(ticker.into(), bars);
    }

    pub fn with_ticker(mut self, ticker: impl Into<String>, bars: Vec<RawBar>) -> Self {
        self.insert(ticker, bars);
        self
    }

    pub fn bars(&self, ticker: &str) -> Option<&[RawBar]> {
        self.bars.get(ticker).map(Vec::as_slice)
    }

    pub fn tickers(&self) -> impl Iterator<Item = &str> {
        self.bars.keys().map(String::as_str)
    }

    pub fn row_count(&self) -> usize {
        self.bars.values().map(Vec::len).sum()
    }

    /// True when no ticker has a single row.
    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }
}

/// A cleaned daily record. Prices are only `None` for leading gaps the
/// forward fill could not reach.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanedRecord {
    pub date: NaiveDate,
    pub open: Option<Decimal>,
    pub high: Option<Decimal>,
    pub low: Option<Decimal>,
    pub close: Option<Decimal>,
    pub volume: Option<Decimal>,
    /// Fractional close-to-close change; `None` on the first record.
    pub daily_return: Option<Decimal>,
}

/// What the cleaner had to correct.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleaningReport {
    pub filled_values: usize,
    pub duplicates_removed: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CleanedSeries {
    pub ticker: String,
    pub records: Vec<CleanedRecord>,
    pub report: CleaningReport,
}

impl CleanedSeries {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Trailing mean of closes, aligned index-for-index with the records it
/// was computed from.
#[derive(Debug, Clone, PartialEq)]
pub struct MovingAverageSeries {
    pub window: usize,
    pub values: Vec<Option<Decimal>>,
}

impl MovingAverageSeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Decimal> {
        self.values.get(index).copied().flatten()
    }

    /// Value at the most recent record, if defined.
    pub fn latest(&self) -> Option<Decimal> {
        self.values.last().copied().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn test_table_empty_when_ticker_has_no_rows() {
        let table = RawPriceTable::new().with_ticker("XYZ", Vec::new());
        assert!(table.is_empty());
        assert_eq!(table.tickers().count(), 1);
    }

    #[test]
    fn test_has_missing_detects_any_column() {
        let mut bar = RawBar::complete(day(2), dec!(1), dec!(2), dec!(1), dec!(2), dec!(100));
        assert!(!bar.has_missing());
        bar.volume = None;
        assert!(bar.has_missing());
    }

    #[test]
    fn test_latest_moving_average() {
        let series = MovingAverageSeries {
            window: 2,
            values: vec![None, Some(dec!(11)), Some(dec!(11.5))],
        };
        assert_eq!(series.latest(), Some(dec!(11.5)));
        assert_eq!(series.get(0), None);
        assert_eq!(series.get(9), None);
    }
}
