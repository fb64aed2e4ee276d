pub mod chart_data;
#[cfg(feature = "ui")]
pub mod chart_window;
pub mod headless;

pub use chart_data::ChartSeries;
#[cfg(feature = "ui")]
pub use chart_window::ChartWindowRenderer;
pub use headless::HeadlessRenderer;
