use thiserror::Error;

/// Errors raised while turning a raw price table into metrics
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("No data found for {ticker}")]
    NoData { ticker: String },

    #[error("No usable rows left for {ticker} after cleaning")]
    EmptyAfterCleaning { ticker: String },

    #[error("No records to analyze")]
    EmptySeries,

    #[error("Not enough data: need {required} records, have {available}")]
    InsufficientHistory { required: usize, available: usize },

    #[error("Moving average window must be at least 1, got {window}")]
    InvalidWindow { window: usize },
}

/// Errors raised by market data providers
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid date '{input}': expected YYYY-MM-DD")]
    InvalidDate { input: String },

    #[error("Provider API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Provider error [{code}]: {description}")]
    Provider { code: String, description: String },

    #[error("Failed to parse provider response: {reason}")]
    Parse { reason: String },
}

/// Errors related to the interactive metric menu
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MenuError {
    #[error("Unrecognized metric choice: '{0}'")]
    Unrecognized(String),
}
