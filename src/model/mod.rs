//! Dashboard data model
//!
//! - [`types`]: `Sample`, `TimeRange` and `DashboardState`
//! - [`metrics`]: Derived metrics (count, latest, average)
//! - [`wire`]: JSON bodies exchanged with the remote source

pub mod metrics;
pub mod types;
pub mod wire;

pub use metrics::{
    average_temperature, format_temperature, latest_temperature, point_count, temperature_bounds,
};
pub use types::{DashboardState, ParseRangeError, Sample, TimeRange};
pub use wire::{HealthReport, SamplesResponse, WireSample};
