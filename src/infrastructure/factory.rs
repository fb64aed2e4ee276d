use crate::config::{Config, DataProvider};
use crate::domain::ports::MarketDataProvider;
use crate::infrastructure::alpaca::AlpacaMarketDataProvider;
use crate::infrastructure::mock::MockMarketDataProvider;
use crate::infrastructure::yahoo::YahooMarketDataProvider;
use anyhow::Result;
use std::sync::Arc;

pub struct ServiceFactory;

impl ServiceFactory {
    pub fn create_market_data_provider(config: &Config) -> Result<Arc<dyn MarketDataProvider>> {
        let provider: Arc<dyn MarketDataProvider> = match config.provider {
            DataProvider::Yahoo => Arc::new(YahooMarketDataProvider::new(
                config.yahoo.base_url.clone(),
            )),
            DataProvider::Alpaca => Arc::new(
                AlpacaMarketDataProvider::builder()
                    .api_key(config.alpaca.api_key.clone())
                    .api_secret(config.alpaca.secret_key.clone())
                    .data_base_url(config.alpaca.data_url.clone())
                    .feed(config.alpaca.feed.clone())
                    .build()?,
            ),
            DataProvider::Mock => Arc::new(MockMarketDataProvider::new()),
        };
        Ok(provider)
    }
}
