use super::common::{AlpacaBar, AlpacaBarResponse};
use crate::domain::errors::FetchError;
use crate::domain::market::{RawBar, RawPriceTable};
use crate::domain::ports::MarketDataProvider;
use crate::infrastructure::core::day_bounds;
use crate::infrastructure::core::http_client_factory::{HttpClientFactory, build_url_with_query};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use std::collections::HashMap;
use tracing::{debug, error, info};

// ===== Historical Bars (REST) =====

pub struct AlpacaMarketDataProvider {
    client: ClientWithMiddleware,
    api_key: String,
    api_secret: String,
    data_base_url: String,
    feed: String,
}

impl AlpacaMarketDataProvider {
    pub fn builder() -> AlpacaMarketDataProviderBuilder {
        AlpacaMarketDataProviderBuilder::default()
    }

    /// Pages through `/v2/stocks/bars` until no page token is returned.
    async fn fetch_daily_bars(
        &self,
        symbols: &[String],
        start: &str,
        end: &str,
    ) -> Result<HashMap<String, Vec<AlpacaBar>>> {
        let url = format!("{}/v2/stocks/bars", self.data_base_url);
        let mut all_bars: HashMap<String, Vec<AlpacaBar>> = HashMap::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query_params = vec![
                ("symbols", symbols.join(",")),
                ("start", start.to_string()),
                ("end", end.to_string()),
                ("timeframe", "1Day".to_string()),
                ("limit", "10000".to_string()),
                ("adjustment", "raw".to_string()),
                ("feed", self.feed.clone()),
            ];

            if let Some(token) = &page_token {
                query_params.push(("page_token", token.clone()));
            }

            let url_with_query = build_url_with_query(&url, &query_params);
            debug!("AlpacaMarketDataProvider: GET {}", url_with_query);

            let response = self
                .client
                .get(&url_with_query)
                .header("APCA-API-KEY-ID", &self.api_key)
                .header("APCA-API-SECRET-KEY", &self.api_secret)
                .send()
                .await
                .context("Failed to fetch bars from Alpaca")?;

            if !response.status().is_success() {
                let status = response.status();
                let error_text = response.text().await.unwrap_or_default();
                error!(
                    "AlpacaMarketDataProvider: API error {} for {:?}: {}",
                    status, symbols, error_text
                );
                return Err(FetchError::Api {
                    status: status.as_u16(),
                    body: error_text,
                }
                .into());
            }

            let resp_body: AlpacaBarResponse = response
                .json()
                .await
                .context("Failed to parse bars response")?;

            for (symbol, bars) in resp_body.bars.unwrap_or_default() {
                all_bars.entry(symbol).or_default().extend(bars);
            }

            page_token = resp_body.next_page_token;
            if page_token.is_none() {
                break;
            }
        }

        Ok(all_bars)
    }
}

#[async_trait]
impl MarketDataProvider for AlpacaMarketDataProvider {
    async fn fetch(&self, tickers: &[String], start: &str, end: &str) -> Result<RawPriceTable> {
        let (start, end) = day_bounds(start, end)?;
        let symbols: Vec<String> = tickers.iter().map(|t| t.trim().to_uppercase()).collect();

        let mut bars_by_symbol = self
            .fetch_daily_bars(&symbols, &start.to_rfc3339(), &end.to_rfc3339())
            .await?;

        let mut table = RawPriceTable::new();
        for (ticker, symbol) in tickers.iter().zip(&symbols) {
            let bars = bars_by_symbol
                .remove(symbol)
                .unwrap_or_default()
                .iter()
                .map(AlpacaBar::to_raw_bar)
                .collect::<Result<Vec<RawBar>, FetchError>>()?;
            info!(
                "AlpacaMarketDataProvider: {} daily bars for {}",
                bars.len(),
                symbol
            );
            table.insert(ticker.clone(), bars);
        }

        Ok(table)
    }

    fn name(&self) -> &'static str {
        "alpaca"
    }
}

#[derive(Default)]
pub struct AlpacaMarketDataProviderBuilder {
    api_key: Option<String>,
    api_secret: Option<String>,
    data_base_url: Option<String>,
    feed: Option<String>,
}

impl AlpacaMarketDataProviderBuilder {
    pub fn api_key(mut self, api_key: String) -> Self {
        self.api_key = Some(api_key);
        self
    }

    pub fn api_secret(mut self, api_secret: String) -> Self {
        self.api_secret = Some(api_secret);
        self
    }

    pub fn data_base_url(mut self, data_base_url: String) -> Self {
        self.data_base_url = Some(data_base_url);
        self
    }

    pub fn feed(mut self, feed: String) -> Self {
        self.feed = Some(feed);
        self
    }

    pub fn build(self) -> Result<AlpacaMarketDataProvider> {
        let api_key = self.api_key.context("api_key is required")?;
        let api_secret = self.api_secret.context("api_secret is required")?;
        let data_base_url = self
            .data_base_url
            .unwrap_or_else(|| "https://data.alpaca.markets".to_string());
        let feed = self.feed.unwrap_or_else(|| "iex".to_string());

        Ok(AlpacaMarketDataProvider {
            client: HttpClientFactory::create_client(concat!(
                "stockscope/",
                env!("CARGO_PKG_VERSION")
            )),
            api_key,
            api_secret,
            data_base_url: data_base_url.trim_end_matches('/').to_string(),
            feed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    #[test]
    fn test_builder_requires_credentials() {
        assert!(AlpacaMarketDataProvider::builder().build().is_err());
        assert!(
            AlpacaMarketDataProvider::builder()
                .api_key("k".to_string())
                .api_secret("s".to_string())
                .build()
                .is_ok()
        );
    }

    #[test]
    fn test_bar_response_to_raw_bars() {
        let body = r#"{
            "bars": {"META": [
                {"t": "2024-01-02T05:00:00Z", "o": 351.32, "h": 353.16, "l": 340.01, "c": 346.29, "v": 19042200}
            ]},
            "next_page_token": null
        }"#;
        let response: AlpacaBarResponse = serde_json::from_str(body).unwrap();
        let bars = response.bars.unwrap();
        let raw = bars["META"][0].to_raw_bar().unwrap();

        assert_eq!(raw.date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(raw.close, Some(dec!(346.29)));
        assert!(!raw.has_missing());
    }

    #[test]
    fn test_null_bars_payload() {
        let response: AlpacaBarResponse =
            serde_json::from_str(r#"{"bars": null, "next_page_token": null}"#).unwrap();
        assert!(response.bars.unwrap_or_default().is_empty());
    }

    #[test]
    fn test_bad_timestamp_is_parse_error() {
        let bar = AlpacaBar {
            timestamp: "yesterday".to_string(),
            open: 1.0,
            high: 1.0,
            low: 1.0,
            close: 1.0,
            volume: 1.0,
        };
        assert!(matches!(bar.to_raw_bar(), Err(FetchError::Parse { .. })));
    }
}
