pub mod classify;
pub mod stats;
pub mod time;

pub use classify::{
    classify_pressure, is_high_pressure, is_valid_pressure, validate, CategoryColor,
    PressureCategory, ValidationError, INVALID_PRESSURE_MESSAGE,
};
pub use stats::{ChartPoint, ChartSeries, PressureStats};
