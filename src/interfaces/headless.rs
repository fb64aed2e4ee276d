use crate::domain::market::CleanedRecord;
use crate::domain::ports::ChartRenderer;
use anyhow::Result;
use tracing::warn;

/// Used when the binary is built without the `ui` feature.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeadlessRenderer;

impl ChartRenderer for HeadlessRenderer {
    fn render(&self, records: &[CleanedRecord], ticker: &str) -> Result<()> {
        warn!(
            "Plotting is unavailable in this build; skipping chart of {} records for {}",
            records.len(),
            ticker
        );
        Ok(())
    }
}
