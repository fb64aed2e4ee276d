//! Configuration module for Stockscope.
//!
//! Loaded from environment variables (a `.env` file is read first by the
//! binary), organized by concern: data provider and analysis.

mod provider_config;

pub use provider_config::{AlpacaConfig, YahooConfig};

use crate::domain::analysis::DEFAULT_MOVING_AVERAGE_WINDOW;
use anyhow::{Context, Result};
use std::env;
use std::str::FromStr;

/// Where historical bars come from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataProvider {
    Yahoo,
    Alpaca,
    Mock,
}

impl FromStr for DataProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "yahoo" => Ok(DataProvider::Yahoo),
            "alpaca" => Ok(DataProvider::Alpaca),
            "mock" => Ok(DataProvider::Mock),
            _ => anyhow::bail!(
                "Invalid DATA_PROVIDER: {}. Must be 'yahoo', 'alpaca', or 'mock'",
                s
            ),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub provider: DataProvider,
    pub yahoo: YahooConfig,
    pub alpaca: AlpacaConfig,
    pub moving_average_window: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process
    /// environment.
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let provider = var("DATA_PROVIDER")
            .unwrap_or_else(|| "yahoo".to_string())
            .parse::<DataProvider>()?;

        let moving_average_window = match var("MOVING_AVERAGE_WINDOW") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .with_context(|| format!("Invalid MOVING_AVERAGE_WINDOW: {}", raw))?,
            None => DEFAULT_MOVING_AVERAGE_WINDOW,
        };
        if moving_average_window == 0 {
            anyhow::bail!("MOVING_AVERAGE_WINDOW must be at least 1");
        }

        let alpaca = AlpacaConfig::from_lookup(&var);
        if provider == DataProvider::Alpaca && !alpaca.has_credentials() {
            anyhow::bail!("DATA_PROVIDER=alpaca requires ALPACA_API_KEY and ALPACA_SECRET_KEY");
        }

        Ok(Self {
            provider,
            yahoo: YahooConfig::from_lookup(&var),
            alpaca,
            moving_average_window,
        })
    }
}
