// Price data model
pub mod types;

pub use types::{
    CleanedRecord, CleanedSeries, CleaningReport, MovingAverageSeries, RawBar, RawPriceTable,
};
