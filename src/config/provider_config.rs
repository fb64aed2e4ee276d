//! Market data provider configuration parsing from environment variables.
//!
//! - Yahoo Finance (default, no credentials)
//! - Alpaca (stock bars, key + secret)

/// Yahoo Finance chart API configuration
#[derive(Debug, Clone)]
pub struct YahooConfig {
    pub base_url: String,
}

impl YahooConfig {
    pub fn from_lookup(var: &impl Fn(&str) -> Option<String>) -> Self {
        Self {
            base_url: var("YAHOO_BASE_URL")
                .unwrap_or_else(|| "https://query1.finance.yahoo.com/v8/finance/chart".to_string()),
        }
    }
}

/// Alpaca market data configuration
#[derive(Debug, Clone, Default)]
pub struct AlpacaConfig {
    pub api_key: String,
    pub secret_key: String,
    pub data_url: String,
    pub feed: String,
}

impl AlpacaConfig {
    pub fn from_lookup(var: &impl Fn(&str) -> Option<String>) -> Self {
        Self {
            api_key: var("ALPACA_API_KEY").unwrap_or_default(),
            secret_key: var("ALPACA_SECRET_KEY").unwrap_or_default(),
            data_url: var("ALPACA_DATA_URL")
                .unwrap_or_else(|| "https://data.alpaca.markets".to_string()),
            feed: var("ALPACA_FEED").unwrap_or_else(|| "iex".to_string()),
        }
    }

    pub fn has_credentials(&self) -> bool {
        !self.api_key.is_empty() && !self.secret_key.is_empty()
    }
}
