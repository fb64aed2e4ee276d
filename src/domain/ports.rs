use crate::domain::market::{CleanedRecord, RawPriceTable};
use anyhow::Result;
use async_trait::async_trait;

/// Source of historical daily bars.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Daily rows for every ticker in `[start, end)`. Dates are passed through
    /// as entered; a provider that cannot interpret them returns an error.
    async fn fetch(&self, tickers: &[String], start: &str, end: &str) -> Result<RawPriceTable>;

    fn name(&self) -> &'static str;
}

/// Draws the close price and its moving average. Blocks until dismissed.
pub trait ChartRenderer {
    fn render(&self, records: &[CleanedRecord], ticker: &str) -> Result<()>;
}
