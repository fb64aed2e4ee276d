use crate::domain::market::{RawBar, RawPriceTable};
use crate::domain::ports::MarketDataProvider;
use crate::infrastructure::core::parse_iso_date;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{Datelike, Days, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal_macros::dec;
use tracing::info;

/// Offline provider: a seeded random walk per ticker over the weekdays of
/// the requested range. The same ticker and range always yield the same bars.
#[derive(Debug, Clone)]
pub struct MockMarketDataProvider {
    base_price: Decimal,
    daily_volatility: f64,
}

impl MockMarketDataProvider {
    pub fn new() -> Self {
        Self {
            base_price: dec!(150),
            daily_volatility: 0.02,
        }
    }

    pub fn with_base_price(mut self, base_price: Decimal) -> Self {
        self.base_price = base_price;
        self
    }

    fn seed_for(ticker: &str) -> u64 {
        ticker
            .trim()
            .to_uppercase()
            .bytes()
            .fold(0xcbf2_9ce4_8422_2325, |hash, b| {
                (hash ^ b as u64).wrapping_mul(0x0100_0000_01b3)
            })
    }

    pub fn generate(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> Vec<RawBar> {
        let mut rng = StdRng::seed_from_u64(Self::seed_for(ticker));
        let mut price = self.base_price;
        let mut bars = Vec::new();
        let mut date = start;

        while date < end {
            if !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
                let open = price;
                let change = rng.random_range(-self.daily_volatility..self.daily_volatility);
                let close = (open * (Decimal::ONE + Decimal::from_f64(change).unwrap_or_default()))
                    .round_dp(2)
                    .max(dec!(0.01));
                let wick = Decimal::from_f64(rng.random_range(0.0..0.01)).unwrap_or_default();
                let high = (open.max(close) * (Decimal::ONE + wick)).round_dp(2);
                let low = (open.min(close) * (Decimal::ONE - wick)).round_dp(2);
                let volume = Decimal::from(rng.random_range(500_000u64..5_000_000));

                bars.push(RawBar::complete(date, open, high, low, close, volume));
                price = close;
            }
            date = match date.checked_add_days(Days::new(1)) {
                Some(next) => next,
                None => break,
            };
        }

        bars
    }
}

impl Default for MockMarketDataProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MarketDataProvider for MockMarketDataProvider {
    async fn fetch(&self, tickers: &[String], start: &str, end: &str) -> Result<RawPriceTable> {
        let start = parse_iso_date(start)?;
        let end = parse_iso_date(end)?;

        let mut table = RawPriceTable::new();
        for ticker in tickers {
            let bars = self.generate(ticker, start, end);
            info!(
                "MockMarketDataProvider: generated {} bars for {}",
                bars.len(),
                ticker
            );
            table.insert(ticker.clone(), bars);
        }
        Ok(table)
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        parse_iso_date(s).unwrap()
    }

    #[test]
    fn test_generates_weekdays_only() {
        let provider = MockMarketDataProvider::new();
        // Mon 2024-01-01 .. Mon 2024-01-15 (exclusive): 10 weekdays
        let bars = provider.generate("META", date("2024-01-01"), date("2024-01-15"));

        assert_eq!(bars.len(), 10);
        assert!(
            bars.iter()
                .all(|b| !matches!(b.date.weekday(), Weekday::Sat | Weekday::Sun))
        );
        assert!(bars.iter().all(|b| b.low.unwrap() <= b.high.unwrap()));
    }

    #[test]
    fn test_deterministic_per_ticker() {
        let provider = MockMarketDataProvider::new();
        let a = provider.generate("meta", date("2024-01-01"), date("2024-02-01"));
        let b = provider.generate("META", date("2024-01-01"), date("2024-02-01"));
        let c = provider.generate("AAPL", date("2024-01-01"), date("2024-02-01"));

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_reversed_range_is_empty() {
        let provider = MockMarketDataProvider::new();
        let table = tokio_test::block_on(provider.fetch(
            &["META".to_string()],
            "2024-02-01",
            "2024-01-01",
        ))
        .unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_bad_date_is_error() {
        let provider = MockMarketDataProvider::new();
        let result =
            tokio_test::block_on(provider.fetch(&["META".to_string()], "soon", "2024-01-01"));
        assert!(result.is_err());
    }
}
