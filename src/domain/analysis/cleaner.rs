use crate::domain::errors::AnalysisError;
use crate::domain::market::{CleanedRecord, CleanedSeries, CleaningReport, RawBar, RawPriceTable};
use rust_decimal::Decimal;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Cleans one ticker's rows out of a raw table.
///
/// Rows are ordered by date, gaps are forward-filled column by column, fully
/// duplicated rows are dropped, and a daily return is derived from the close.
pub fn clean_and_reshape(
    table: &RawPriceTable,
    ticker: &str,
) -> Result<CleanedSeries, AnalysisError> {
    if table.is_empty() {
        warn!("No data found for {}", ticker);
        return Err(AnalysisError::NoData {
            ticker: ticker.to_string(),
        });
    }

    let Some(source) = table.bars(ticker).filter(|bars| !bars.is_empty()) else {
        warn!("No rows for {} in the downloaded table", ticker);
        return Err(AnalysisError::NoData {
            ticker: ticker.to_string(),
        });
    };

    let mut bars = source.to_vec();
    bars.sort_by_key(|bar| bar.date);

    let mut report = CleaningReport::default();

    if bars.iter().any(RawBar::has_missing) {
        warn!(
            "Missing values found for {}. Filling missing values...",
            ticker
        );
        report.filled_values = forward_fill(&mut bars);
    }

    let (bars, removed) = drop_duplicate_rows(bars);
    if removed > 0 {
        warn!(
            "Duplicate rows found for {}. Removed {} duplicate(s)",
            ticker, removed
        );
    }
    report.duplicates_removed = removed;

    if bars.iter().all(|bar| bar.close.is_none()) {
        warn!("Every close for {} is missing", ticker);
        return Err(AnalysisError::EmptyAfterCleaning {
            ticker: ticker.to_string(),
        });
    }

    let records = with_daily_returns(bars);
    debug!(
        "Cleaned {} rows for {} (filled={}, duplicates={})",
        records.len(),
        ticker,
        report.filled_values,
        report.duplicates_removed
    );

    Ok(CleanedSeries {
        ticker: ticker.to_string(),
        records,
        report,
    })
}

/// Replaces each missing value with the most recent prior value in the same
/// column. Leading gaps stay empty. Returns how many values were filled.
pub fn forward_fill(bars: &mut [RawBar]) -> usize {
    let mut carried: [Option<Decimal>; 5] = [None; 5];
    let mut filled = 0;

    for bar in bars.iter_mut() {
        let columns = [
            &mut bar.open,
            &mut bar.high,
            &mut bar.low,
            &mut bar.close,
            &mut bar.volume,
        ];

        for (slot, last) in columns.into_iter().zip(carried.iter_mut()) {
            match *slot {
                Some(value) => *last = Some(value),
                None => {
                    if let Some(value) = *last {
                        *slot = Some(value);
                        filled += 1;
                    }
                }
            }
        }
    }

    filled
}

/// Keeps the first occurrence of every row, comparing date and all columns.
pub fn drop_duplicate_rows(bars: Vec<RawBar>) -> (Vec<RawBar>, usize) {
    let mut seen = HashSet::with_capacity(bars.len());
    let mut kept = Vec::with_capacity(bars.len());
    let mut removed = 0;

    for bar in bars {
        if seen.insert(bar.clone()) {
            kept.push(bar);
        } else {
            removed += 1;
        }
    }

    (kept, removed)
}

fn with_daily_returns(bars: Vec<RawBar>) -> Vec<CleanedRecord> {
    let mut previous_close: Option<Decimal> = None;

    bars.into_iter()
        .enumerate()
        .map(|(i, bar)| {
            let daily_return = if i == 0 {
                None
            } else {
                pct_change(previous_close, bar.close)
            };
            previous_close = bar.close;

            CleanedRecord {
                date: bar.date,
                open: bar.open,
                high: bar.high,
                low: bar.low,
                close: bar.close,
                volume: bar.volume,
                daily_return,
            }
        })
        .collect()
}

fn pct_change(previous: Option<Decimal>, current: Option<Decimal>) -> Option<Decimal> {
    let (previous, current) = (previous?, current?);
    if previous.is_zero() {
        return None;
    }
    (current - previous).checked_div(previous)
}
