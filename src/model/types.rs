//! Core data types for the dashboard
//!
//! This module defines the fundamental types shared by the source, the
//! controller and the presentation layer:
//! - `Sample`: A single timestamped temperature reading
//! - `TimeRange`: The lookback window requested from the source
//! - `DashboardState`: Everything the presentation layer renders

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::metrics;

/// A single temperature reading
///
/// Immutable once received. Samples are kept in the order the source
/// delivered them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Sample {
    /// When the reading was taken
    pub timestamp: DateTime<Utc>,
    /// Temperature in degrees Celsius
    pub temperature: f64,
}

impl Sample {
    /// Create a new sample
    pub fn new(timestamp: DateTime<Utc>, temperature: f64) -> Self {
        Self {
            timestamp,
            temperature,
        }
    }
}

/// Lookback window requested from the source
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum TimeRange {
    #[default]
    #[serde(rename = "1h")]
    LastHour,
    #[serde(rename = "6h")]
    Last6Hours,
    #[serde(rename = "24h")]
    Last24Hours,
}

impl TimeRange {
    /// All ranges in display order
    pub fn all() -> &'static [TimeRange] {
        &[
            TimeRange::LastHour,
            TimeRange::Last6Hours,
            TimeRange::Last24Hours,
        ]
    }

    /// Value sent as the range query parameter
    pub fn as_query(&self) -> &'static str {
        match self {
            TimeRange::LastHour => "1h",
            TimeRange::Last6Hours => "6h",
            TimeRange::Last24Hours => "24h",
        }
    }

    /// Human-readable label for selectors
    pub fn label(&self) -> &'static str {
        match self {
            TimeRange::LastHour => "Last hour",
            TimeRange::Last6Hours => "Last 6 hours",
            TimeRange::Last24Hours => "Last 24 hours",
        }
    }

    /// Zero-based position in [`TimeRange::all`]
    pub fn index(&self) -> usize {
        match self {
            TimeRange::LastHour => 0,
            TimeRange::Last6Hours => 1,
            TimeRange::Last24Hours => 2,
        }
    }

    /// Advance to the next range (wrapping).
    pub fn next(&self) -> TimeRange {
        match self {
            TimeRange::LastHour => TimeRange::Last6Hours,
            TimeRange::Last6Hours => TimeRange::Last24Hours,
            TimeRange::Last24Hours => TimeRange::LastHour,
        }
    }
}

impl std::fmt::Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_query())
    }
}

/// Error returned when a string is not one of `1h`, `6h`, `24h`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid range '{0}'. Use: 1h, 6h, 24h")]
pub struct ParseRangeError(pub String);

impl FromStr for TimeRange {
    type Err = ParseRangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1h" => Ok(TimeRange::LastHour),
            "6h" => Ok(TimeRange::Last6Hours),
            "24h" => Ok(TimeRange::Last24Hours),
            other => Err(ParseRangeError(other.to_string())),
        }
    }
}

/// Observable dashboard state
///
/// Owned by the controller. The poll cycle replaces `samples` wholesale on
/// success; on failure it only sets `error`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardState {
    /// Samples from the last successful fetch
    pub samples: Vec<Sample>,
    /// Wall-clock time of the last successful fetch
    pub last_updated: Option<DateTime<Utc>>,
    /// User-facing error from the most recent failed fetch
    pub error: Option<String>,
    /// Range currently being polled
    pub active_range: TimeRange,
}

impl DashboardState {
    /// Create an empty state polling the given range
    pub fn new(active_range: TimeRange) -> Self {
        Self {
            active_range,
            ..Self::default()
        }
    }

    /// Whether the last poll tick succeeded
    pub fn is_connected(&self) -> bool {
        self.error.is_none() && self.last_updated.is_some()
    }

    pub fn point_count(&self) -> usize {
        metrics::point_count(&self.samples)
    }

    pub fn latest_temperature(&self) -> Option<f64> {
        metrics::latest_temperature(&self.samples)
    }

    pub fn average_temperature(&self) -> Option<f64> {
        metrics::average_temperature(&self.samples)
    }

    pub fn temperature_bounds(&self) -> Option<(f64, f64)> {
        metrics::temperature_bounds(&self.samples)
    }
}
