use crate::domain::errors::FetchError;
use crate::domain::market::RawBar;
use chrono::DateTime;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Deserialize, Clone, Serialize)]
pub struct AlpacaBar {
    #[serde(rename = "t")]
    pub timestamp: String,
    #[serde(rename = "o")]
    pub open: f64,
    #[serde(rename = "h")]
    pub high: f64,
    #[serde(rename = "l")]
    pub low: f64,
    #[serde(rename = "c")]
    pub close: f64,
    #[serde(rename = "v")]
    pub volume: f64,
}

#[derive(Debug, Deserialize)]
pub struct AlpacaBarResponse {
    #[serde(default)]
    pub bars: Option<HashMap<String, Vec<AlpacaBar>>>,
    pub next_page_token: Option<String>,
}

impl AlpacaBar {
    /// Daily bars are stamped at the session's local midnight, so the UTC
    /// calendar date is the trading date.
    pub fn to_raw_bar(&self) -> Result<RawBar, FetchError> {
        let date = DateTime::parse_from_rfc3339(&self.timestamp)
            .map_err(|e| FetchError::Parse {
                reason: format!("bad bar timestamp '{}': {}", self.timestamp, e),
            })?
            .date_naive();

        Ok(RawBar {
            date,
            open: Decimal::from_f64(self.open),
            high: Decimal::from_f64(self.high),
            low: Decimal::from_f64(self.low),
            close: Decimal::from_f64(self.close),
            volume: Decimal::from_f64(self.volume),
        })
    }
}
