use crate::domain::errors::AnalysisError;
use crate::domain::market::{CleanedRecord, MovingAverageSeries};
use rust_decimal::Decimal;
use tracing::warn;

pub const DEFAULT_MOVING_AVERAGE_WINDOW: usize = 20;

/// Direction of a single trading day, comparing close against open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayDirection {
    Up,
    Down,
    Flat,
}

impl DayDirection {
    /// `None` when either price is undefined.
    pub fn of(record: &CleanedRecord) -> Option<Self> {
        let (open, close) = (record.open?, record.close?);
        Some(match close.cmp(&open) {
            std::cmp::Ordering::Greater => DayDirection::Up,
            std::cmp::Ordering::Less => DayDirection::Down,
            std::cmp::Ordering::Equal => DayDirection::Flat,
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectionCounts {
    pub up: usize,
    pub down: usize,
    pub flat: usize,
    pub undefined: usize,
}

impl DirectionCounts {
    pub fn total(&self) -> usize {
        self.up + self.down + self.flat + self.undefined
    }
}

pub fn direction_counts(records: &[CleanedRecord]) -> DirectionCounts {
    records
        .iter()
        .fold(DirectionCounts::default(), |mut counts, record| {
            match DayDirection::of(record) {
                Some(DayDirection::Up) => counts.up += 1,
                Some(DayDirection::Down) => counts.down += 1,
                Some(DayDirection::Flat) => counts.flat += 1,
                None => counts.undefined += 1,
            }
            counts
        })
}

/// Number of days that closed above their open.
pub fn up_days(records: &[CleanedRecord]) -> usize {
    if records.is_empty() {
        warn!("No data found.");
        return 0;
    }
    direction_counts(records).up
}

/// Last close minus first close.
pub fn try_realized_gain_loss(records: &[CleanedRecord]) -> Result<Decimal, AnalysisError> {
    let insufficient = || AnalysisError::InsufficientHistory {
        required: 2,
        available: records.iter().filter(|r| r.close.is_some()).count(),
    };

    if records.len() < 2 {
        return Err(insufficient());
    }

    match (
        records.first().and_then(|r| r.close),
        records.last().and_then(|r| r.close),
    ) {
        (Some(initial), Some(last)) => Ok(last - initial),
        _ => Err(insufficient()),
    }
}

/// Like [`try_realized_gain_loss`], reporting zero when history is too short.
pub fn realized_gain_loss(records: &[CleanedRecord]) -> Decimal {
    match try_realized_gain_loss(records) {
        Ok(gain) => gain,
        Err(e) => {
            warn!("{}", e);
            Decimal::ZERO
        }
    }
}

/// Trailing mean of closes over `window` records.
///
/// Entries before the window fills are `None`, as is any entry whose window
/// still contains an undefined close.
pub fn moving_average(
    records: &[CleanedRecord],
    window: usize,
) -> Result<MovingAverageSeries, AnalysisError> {
    if window == 0 {
        return Err(AnalysisError::InvalidWindow { window });
    }
    if records.is_empty() {
        warn!("No data found.");
        return Err(AnalysisError::EmptySeries);
    }
    if records.len() < window {
        warn!(
            "{}",
            AnalysisError::InsufficientHistory {
                required: window,
                available: records.len(),
            }
        );
    }

    let closes: Vec<Option<Decimal>> = records.iter().map(|r| r.close).collect();
    let divisor = Decimal::from(window);

    let values = (0..closes.len())
        .map(|i| {
            if i + 1 < window {
                return None;
            }
            closes[i + 1 - window..=i]
                .iter()
                .try_fold(Decimal::ZERO, |sum, close| close.map(|c| sum + c))
                .map(|sum| sum / divisor)
        })
        .collect();

    Ok(MovingAverageSeries { window, values })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Days, NaiveDate};
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn records(opens: &[Decimal], closes: &[Decimal]) -> Vec<CleanedRecord> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        opens
            .iter()
            .zip(closes)
            .enumerate()
            .map(|(i, (open, close))| CleanedRecord {
                date: start + Days::new(i as u64),
                open: Some(*open),
                high: Some(*open.max(close)),
                low: Some(*open.min(close)),
                close: Some(*close),
                volume: Some(dec!(1000)),
                daily_return: None,
            })
            .collect()
    }

    fn closes_only(closes: &[Decimal]) -> Vec<CleanedRecord> {
        records(closes, closes)
    }

    #[test]
    fn test_five_day_scenario() {
        let data = records(
            &[dec!(9), dec!(11), dec!(12), dec!(14), dec!(15)],
            &[dec!(10), dec!(12), dec!(11), dec!(15), dec!(14)],
        );

        assert_eq!(up_days(&data), 3);
        assert_eq!(realized_gain_loss(&data), dec!(4.0));
    }

    #[test]
    fn test_single_row() {
        let data = records(&[dec!(9)], &[dec!(10)]);

        assert_eq!(up_days(&data), 1);
        assert_eq!(realized_gain_loss(&data), Decimal::ZERO);
        assert_eq!(
            try_realized_gain_loss(&data),
            Err(AnalysisError::InsufficientHistory {
                required: 2,
                available: 1
            })
        );
    }

    #[test]
    fn test_empty_records() {
        assert_eq!(up_days(&[]), 0);
        assert_eq!(realized_gain_loss(&[]), Decimal::ZERO);
        assert_eq!(
            moving_average(&[], DEFAULT_MOVING_AVERAGE_WINDOW),
            Err(AnalysisError::EmptySeries)
        );
    }

    #[test]
    fn test_undefined_endpoint_is_insufficient() {
        let mut data = closes_only(&[dec!(10), dec!(11), dec!(12)]);
        data[0].close = None;

        assert!(matches!(
            try_realized_gain_loss(&data),
            Err(AnalysisError::InsufficientHistory { .. })
        ));
        assert_eq!(DayDirection::of(&data[0]), None);
    }

    #[test]
    fn test_moving_average_twenty_five_rows() {
        let closes: Vec<Decimal> = (1..=25).map(Decimal::from).collect();
        let data = closes_only(&closes);

        let series = moving_average(&data, 20).unwrap();

        assert_eq!(series.len(), 25);
        assert!(series.values[..19].iter().all(Option::is_none));
        // mean of 1..=20
        assert_eq!(series.get(19), Some(dec!(10.5)));
        // mean of 6..=25
        assert_eq!(series.latest(), Some(dec!(15.5)));
        assert_eq!(series.values[19..].iter().flatten().count(), 6);
    }

    #[test]
    fn test_moving_average_short_history() {
        let data = closes_only(&[dec!(10), dec!(11)]);
        let series = moving_average(&data, 20).unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series.latest(), None);
    }

    #[test]
    fn test_moving_average_rejects_zero_window() {
        let data = closes_only(&[dec!(10)]);
        assert_eq!(
            moving_average(&data, 0),
            Err(AnalysisError::InvalidWindow { window: 0 })
        );
    }

    #[test]
    fn test_moving_average_skips_windows_with_leading_gap() {
        let mut data = closes_only(&[dec!(10), dec!(12), dec!(14)]);
        data[0].close = None;

        let series = moving_average(&data, 2).unwrap();
        assert_eq!(series.values, vec![None, None, Some(dec!(13))]);
    }

    fn arb_prices() -> impl Strategy<Value = Vec<(i64, i64)>> {
        prop::collection::vec((1i64..100_000, 1i64..100_000), 1..60)
    }

    fn to_records(prices: &[(i64, i64)]) -> Vec<CleanedRecord> {
        let opens: Vec<Decimal> = prices.iter().map(|(o, _)| Decimal::new(*o, 2)).collect();
        let closes: Vec<Decimal> = prices.iter().map(|(_, c)| Decimal::new(*c, 2)).collect();
        records(&opens, &closes)
    }

    proptest! {
        #[test]
        fn prop_up_days_partition(prices in arb_prices()) {
            let data = to_records(&prices);
            let counts = direction_counts(&data);
            let up = up_days(&data);

            prop_assert!(up <= data.len());
            prop_assert_eq!(up, data.len() - (counts.down + counts.flat));
            prop_assert_eq!(counts.total(), data.len());
        }

        #[test]
        fn prop_unit_window_is_close(prices in arb_prices()) {
            let data = to_records(&prices);
            let series = moving_average(&data, 1).unwrap();
            for (value, record) in series.values.iter().zip(&data) {
                prop_assert_eq!(*value, record.close);
            }
        }

        #[test]
        fn prop_window_mean(prices in arb_prices(), window in 1usize..10) {
            let data = to_records(&prices);
            let series = moving_average(&data, window).unwrap();
            for i in (window - 1)..data.len() {
                let sum: Decimal = data[i + 1 - window..=i].iter().filter_map(|r| r.close).sum();
                prop_assert_eq!(series.get(i), Some(sum / Decimal::from(window)));
            }
        }

        #[test]
        fn prop_gain_is_antisymmetric(prices in arb_prices()) {
            let data = to_records(&prices);
            let mut reversed = data.clone();
            reversed.reverse();
            prop_assert_eq!(realized_gain_loss(&data), -realized_gain_loss(&reversed));
        }
    }
}
