use super::common::{YahooChartResponse, YahooChartResult};
use crate::domain::errors::FetchError;
use crate::domain::market::{RawBar, RawPriceTable};
use crate::domain::ports::MarketDataProvider;
use crate::infrastructure::core::day_bounds;
use crate::infrastructure::core::http_client_factory::{
    BROWSER_USER_AGENT, HttpClientFactory, build_url_with_query, urlencoding_encode,
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest_middleware::ClientWithMiddleware;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use tracing::{debug, error, info};

/// Daily bars from the Yahoo Finance chart endpoint.
pub struct YahooMarketDataProvider {
    client: ClientWithMiddleware,
    base_url: String,
}

impl YahooMarketDataProvider {
    pub fn new(base_url: String) -> Self {
        Self {
            client: HttpClientFactory::create_client(BROWSER_USER_AGENT),
            base_url,
        }
    }

    async fn fetch_symbol(
        &self,
        ticker: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<RawBar>> {
        let url = format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            urlencoding_encode(ticker.trim())
        );
        let url_with_query = build_url_with_query(
            &url,
            &[
                ("period1", start.timestamp().to_string()),
                ("period2", end.timestamp().to_string()),
                ("interval", "1d".to_string()),
                ("events", "history".to_string()),
            ],
        );

        debug!("YahooMarketDataProvider: GET {}", url_with_query);

        let response = self
            .client
            .get(&url_with_query)
            .send()
            .await
            .context("Failed to fetch chart from Yahoo Finance")?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read Yahoo Finance response")?;

        if !status.is_success() {
            // Yahoo reports unknown symbols as a chart error with a 404
            let chart_error = serde_json::from_str::<YahooChartResponse>(&body)
                .ok()
                .and_then(|r| r.chart.error);
            let err = match chart_error {
                Some(e) => FetchError::Provider {
                    code: e.code,
                    description: e.description,
                },
                None => FetchError::Api {
                    status: status.as_u16(),
                    body,
                },
            };
            error!("YahooMarketDataProvider: {} for {}", err, ticker);
            return Err(err.into());
        }

        Ok(parse_chart_response(&body)?)
    }
}

#[async_trait]
impl MarketDataProvider for YahooMarketDataProvider {
    async fn fetch(&self, tickers: &[String], start: &str, end: &str) -> Result<RawPriceTable> {
        let (start, end) = day_bounds(start, end)?;
        let mut table = RawPriceTable::new();

        for ticker in tickers {
            let bars = self.fetch_symbol(ticker, start, end).await?;
            info!(
                "YahooMarketDataProvider: {} daily bars for {}",
                bars.len(),
                ticker
            );
            table.insert(ticker.clone(), bars);
        }

        Ok(table)
    }

    fn name(&self) -> &'static str {
        "yahoo"
    }
}

/// Decodes a chart payload into daily rows. Null prices stay `None`.
pub fn parse_chart_response(body: &str) -> Result<Vec<RawBar>, FetchError> {
    let response: YahooChartResponse =
        serde_json::from_str(body).map_err(|e| FetchError::Parse {
            reason: e.to_string(),
        })?;

    if let Some(e) = response.chart.error {
        return Err(FetchError::Provider {
            code: e.code,
            description: e.description,
        });
    }

    match response.chart.result.and_then(|r| r.into_iter().next()) {
        Some(result) => bars_from_result(result),
        None => Ok(Vec::new()),
    }
}

fn bars_from_result(result: YahooChartResult) -> Result<Vec<RawBar>, FetchError> {
    let offset = result.meta.map(|m| m.gmtoffset).unwrap_or(0);
    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();

    let value = |column: &[Option<f64>], i: usize| -> Option<Decimal> {
        column
            .get(i)
            .copied()
            .flatten()
            .and_then(Decimal::from_f64)
    };

    result
        .timestamp
        .iter()
        .enumerate()
        .map(|(i, ts)| {
            let date = DateTime::from_timestamp(ts + offset, 0)
                .ok_or_else(|| FetchError::Parse {
                    reason: format!("timestamp out of range: {}", ts),
                })?
                .date_naive();

            Ok(RawBar {
                date,
                open: value(&quote.open, i),
                high: value(&quote.high, i),
                low: value(&quote.low, i),
                close: value(&quote.close, i),
                volume: value(&quote.volume, i),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    const CHART: &str = r#"{
        "chart": {
            "result": [{
                "meta": {"symbol": "META", "gmtoffset": -18000},
                "timestamp": [1704205800, 1704292200, 1704378600],
                "indicators": {
                    "quote": [{
                        "open": [351.32, 344.98, null],
                        "high": [353.16, 348.15, 351.2],
                        "low": [340.01, 343.17, 344.5],
                        "close": [346.29, 344.47, null],
                        "volume": [19042200, 15451100, 12100000]
                    }]
                }
            }],
            "error": null
        }
    }"#;

    #[test]
    fn test_parse_chart_keeps_nulls() {
        let bars = parse_chart_response(CHART).unwrap();

        assert_eq!(bars.len(), 3);
        assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(bars[2].date, NaiveDate::from_ymd_opt(2024, 1, 4).unwrap());
        assert_eq!(bars[0].close, Some(dec!(346.29)));
        assert_eq!(bars[1].volume, Some(dec!(15451100)));
        assert_eq!(bars[2].open, None);
        assert_eq!(bars[2].close, None);
    }

    #[test]
    fn test_parse_chart_without_timestamps_is_empty() {
        let body = r#"{"chart":{"result":[{"meta":{"gmtoffset":0},"indicators":{"quote":[{}]}}],"error":null}}"#;
        assert!(parse_chart_response(body).unwrap().is_empty());
    }

    #[test]
    fn test_parse_chart_error() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        let err = parse_chart_response(body).unwrap_err();
        assert!(matches!(err, FetchError::Provider { ref code, .. } if code == "Not Found"));
    }

    #[test]
    fn test_parse_garbage() {
        assert!(matches!(
            parse_chart_response("<html>"),
            Err(FetchError::Parse { .. })
        ));
    }

    #[tokio::test]
    async fn test_fetch_rejects_malformed_dates() {
        let provider = YahooMarketDataProvider::new("http://127.0.0.1:9".to_string());
        let err = provider
            .fetch(&["META".to_string()], "01/02/2024", "2024-02-01")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("01/02/2024"));
    }
}
