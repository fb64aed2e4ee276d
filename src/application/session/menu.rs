use crate::domain::errors::MenuError;
use std::str::FromStr;

/// The metrics offered at the menu prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricChoice {
    UpDays,
    RealizedGainLoss,
    MovingAverage,
}

impl MetricChoice {
    /// Menu lines, numbered in prompt order.
    pub fn menu_lines(window: usize) -> [String; 3] {
        [
            "1. Up days".to_string(),
            "2. Realized gain/loss".to_string(),
            format!("3. {}-Day Moving Average", window),
        ]
    }
}

impl FromStr for MetricChoice {
    type Err = MenuError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(MetricChoice::UpDays),
            "2" => Ok(MetricChoice::RealizedGainLoss),
            "3" => Ok(MetricChoice::MovingAverage),
            other => Err(MenuError::Unrecognized(other.to_string())),
        }
    }
}
