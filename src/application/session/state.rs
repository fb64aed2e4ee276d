use super::menu::MetricChoice;
use crate::domain::market::{CleanedSeries, RawPriceTable};

/// Where the prompt loop is. Each state owns the data gathered so far in
/// the current iteration; returning to `AwaitTicker` drops it.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    AwaitTicker,
    AwaitDateRange {
        ticker: String,
    },
    Fetching {
        ticker: String,
        start: String,
        end: String,
    },
    Cleaning {
        ticker: String,
        table: RawPriceTable,
    },
    AwaitMetricChoice {
        series: CleanedSeries,
    },
    Computing {
        series: CleanedSeries,
        choice: MetricChoice,
    },
    AwaitPlotChoice {
        series: CleanedSeries,
    },
    Exit,
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::AwaitTicker => "AwaitTicker",
            SessionState::AwaitDateRange { .. } => "AwaitDateRange",
            SessionState::Fetching { .. } => "Fetching",
            SessionState::Cleaning { .. } => "Cleaning",
            SessionState::AwaitMetricChoice { .. } => "AwaitMetricChoice",
            SessionState::Computing { .. } => "Computing",
            SessionState::AwaitPlotChoice { .. } => "AwaitPlotChoice",
            SessionState::Exit => "Exit",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Exit)
    }
}
