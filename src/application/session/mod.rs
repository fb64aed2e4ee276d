//! Interactive prompt loop.
//!
//! The loop is an explicit [`SessionState`] machine advanced by
//! [`Session::step`]. Fetch, cleaning and menu failures are reported to the
//! user and restart the iteration at the ticker prompt; renderer and I/O
//! failures end the session with an error.

mod menu;
mod state;

pub use menu::MetricChoice;
pub use state::SessionState;

use crate::domain::analysis::{clean_and_reshape, moving_average, realized_gain_loss, up_days};
use crate::domain::errors::AnalysisError;
use crate::domain::market::CleanedSeries;
use crate::domain::ports::{ChartRenderer, MarketDataProvider};
use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::sync::Arc;
use tokio::runtime::Runtime;
use tracing::{debug, info, warn};

pub const TICKER_PROMPT: &str = "Enter the stock ticker (e.g., META or 'quit' to exit): ";
pub const START_DATE_PROMPT: &str = "Enter the start date (YYYY-MM-DD): ";
pub const END_DATE_PROMPT: &str = "Enter the end date (YYYY-MM-DD): ";
pub const METRIC_PROMPT: &str = "Enter the number corresponding to your choice (1, 2, or 3): ";
pub const PLOT_PROMPT: &str = "Do you want to plot the stock data? (yes/no): ";

pub const DOWNLOAD_FAILED: &str = "Failed to download data. Please check the ticker or date format.";
pub const UNRECOGNIZED_CHOICE: &str = "Unrecognized metric choice. Please enter 1, 2, or 3.";

const QUIT: &str = "quit";
const PLOT_YES: &str = "yes";

pub struct Session<R, W> {
    input: R,
    output: W,
    provider: Arc<dyn MarketDataProvider>,
    renderer: Box<dyn ChartRenderer>,
    runtime: Runtime,
    window: usize,
    completed: usize,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(
        input: R,
        output: W,
        provider: Arc<dyn MarketDataProvider>,
        renderer: Box<dyn ChartRenderer>,
        window: usize,
    ) -> Result<Self> {
        // Fetches run one at a time on the caller's thread
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("Failed to build Tokio runtime")?;

        Ok(Self {
            input,
            output,
            provider,
            renderer,
            runtime,
            window,
            completed: 0,
        })
    }

    /// Runs until the user types `quit` or input ends.
    pub fn run(&mut self) -> Result<()> {
        info!(
            "Session started (provider={}, window={})",
            self.provider.name(),
            self.window
        );

        let mut state = SessionState::AwaitTicker;
        while !state.is_terminal() {
            debug!("Session state: {}", state.name());
            state = self.step(state)?;
        }

        info!("Session ended after {} analyses", self.completed);
        Ok(())
    }

    /// Advances the machine by one state.
    pub fn step(&mut self, state: SessionState) -> Result<SessionState> {
        let next = match state {
            SessionState::AwaitTicker => match self.prompt(TICKER_PROMPT)? {
                None => SessionState::Exit,
                Some(ticker) if ticker.eq_ignore_ascii_case(QUIT) => SessionState::Exit,
                Some(ticker) if ticker.is_empty() => SessionState::AwaitTicker,
                Some(ticker) => SessionState::AwaitDateRange { ticker },
            },

            SessionState::AwaitDateRange { ticker } => {
                let Some(start) = self.prompt(START_DATE_PROMPT)? else {
                    return Ok(SessionState::Exit);
                };
                let Some(end) = self.prompt(END_DATE_PROMPT)? else {
                    return Ok(SessionState::Exit);
                };
                SessionState::Fetching { ticker, start, end }
            }

            SessionState::Fetching { ticker, start, end } => {
                let tickers = std::slice::from_ref(&ticker);
                match self
                    .runtime
                    .block_on(self.provider.fetch(tickers, &start, &end))
                {
                    Ok(table) => SessionState::Cleaning { ticker, table },
                    Err(e) => {
                        warn!("Error downloading data for {}: {:#}", ticker, e);
                        self.say(DOWNLOAD_FAILED)?;
                        SessionState::AwaitTicker
                    }
                }
            }

            SessionState::Cleaning { ticker, table } => match clean_and_reshape(&table, &ticker) {
                Ok(series) => SessionState::AwaitMetricChoice { series },
                Err(e) => {
                    debug!("Cleaning failed: {}", e);
                    self.say(&format!("No data available for {} after cleaning.", ticker))?;
                    SessionState::AwaitTicker
                }
            },

            SessionState::AwaitMetricChoice { series } => {
                self.say("Select a metric to analyze:")?;
                for line in MetricChoice::menu_lines(self.window) {
                    self.say(&line)?;
                }
                match self.prompt(METRIC_PROMPT)? {
                    None => SessionState::Exit,
                    Some(raw) => match raw.parse::<MetricChoice>() {
                        Ok(choice) => SessionState::Computing { series, choice },
                        Err(e) => {
                            debug!("{}", e);
                            self.say(UNRECOGNIZED_CHOICE)?;
                            SessionState::AwaitTicker
                        }
                    },
                }
            }

            SessionState::Computing { series, choice } => {
                let line = self.describe(&series, choice);
                self.say(&line)?;
                self.completed += 1;
                SessionState::AwaitPlotChoice { series }
            }

            SessionState::AwaitPlotChoice { series } => match self.prompt(PLOT_PROMPT)? {
                None => SessionState::Exit,
                Some(answer) => {
                    if answer.eq_ignore_ascii_case(PLOT_YES) {
                        self.renderer
                            .render(&series.records, &series.ticker)
                            .with_context(|| format!("Failed to plot {}", series.ticker))?;
                    }
                    SessionState::AwaitTicker
                }
            },

            SessionState::Exit => SessionState::Exit,
        };

        Ok(next)
    }

    /// The result line printed for a metric.
    pub fn describe(&self, series: &CleanedSeries, choice: MetricChoice) -> String {
        match choice {
            MetricChoice::UpDays => format!("Up Days: {}", up_days(&series.records)),
            MetricChoice::RealizedGainLoss => {
                format!("Realized Gain/Loss: {}", realized_gain_loss(&series.records))
            }
            MetricChoice::MovingAverage => {
                let latest = match moving_average(&series.records, self.window) {
                    Ok(average) => average.latest(),
                    Err(AnalysisError::EmptySeries) => None,
                    Err(e) => {
                        warn!("{}", e);
                        None
                    }
                };
                match latest {
                    Some(value) => format!(
                        "{}-Day Moving Average: {}",
                        self.window,
                        value.round_dp(4).normalize()
                    ),
                    None => format!(
                        "Unable to calculate the {}-Day Moving Average.",
                        self.window
                    ),
                }
            }
        }
    }

    fn say(&mut self, line: &str) -> Result<()> {
        writeln!(self.output, "{}", line).context("Failed to write to output")
    }

    /// Prints a prompt and reads one trimmed line. `None` at end of input.
    fn prompt(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{}", prompt).context("Failed to write prompt")?;
        self.output.flush().context("Failed to flush output")?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Failed to read input")?;
        if read == 0 {
            writeln!(self.output).context("Failed to write to output")?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    pub fn into_output(self) -> W {
        self.output
    }
}
