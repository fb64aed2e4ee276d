pub mod cleaner;
pub mod metrics;

pub use cleaner::{clean_and_reshape, drop_duplicate_rows, forward_fill};
pub use metrics::{
    DEFAULT_MOVING_AVERAGE_WINDOW, DayDirection, DirectionCounts, direction_counts,
    moving_average, realized_gain_loss, try_realized_gain_loss, up_days,
};
