use crate::domain::analysis::moving_average;
use crate::domain::market::CleanedRecord;
use chrono::NaiveTime;
use rust_decimal::prelude::ToPrimitive;

/// Plot-ready points: x is the UTC midnight of the trading date in seconds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartSeries {
    pub title: String,
    pub close_label: String,
    pub average_label: String,
    pub close_points: Vec<[f64; 2]>,
    pub average_points: Vec<[f64; 2]>,
}

impl ChartSeries {
    /// Undefined closes and averages are left out of their line.
    pub fn build(records: &[CleanedRecord], ticker: &str, window: usize) -> Self {
        let x = |record: &CleanedRecord| {
            record.date.and_time(NaiveTime::MIN).and_utc().timestamp() as f64
        };

        let close_points = records
            .iter()
            .filter_map(|r| Some([x(r), r.close?.to_f64()?]))
            .collect();

        let average_points = match moving_average(records, window) {
            Ok(series) => records
                .iter()
                .zip(series.values)
                .filter_map(|(r, value)| Some([x(r), value?.to_f64()?]))
                .collect(),
            Err(_) => Vec::new(),
        };

        Self {
            title: format!("{} Stock Price and {}-Day Moving Average", ticker, window),
            close_label: "Closing Price".to_string(),
            average_label: format!("{}-Day Moving Average", window),
            close_points,
            average_points,
        }
    }
}
