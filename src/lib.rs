//! # Thermodash
//!
//! Live temperature dashboard. Polls a backend for time-series temperature
//! readings and renders them as a chart with summary statistics.
//!
//! ## Features
//!
//! - **Polling**: fetch on start, then every 2 seconds, until torn down
//! - **Range selection**: last hour, 6 hours or 24 hours
//! - **Stale-result guard**: late responses never overwrite fresher data
//! - **Derived metrics**: point count, latest and average temperature
//! - **Terminal UI**: ratatui chart with connection status
//!
//! ## Modules
//!
//! - [`model`]: Samples, ranges, dashboard state and derived metrics
//! - [`source`]: Remote sample source (HTTP)
//! - [`dashboard`]: Controller and poll loop
//! - [`config`]: TOML + environment configuration
//! - [`tui`]: Terminal presentation
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use thermodash::{DashboardController, HttpSampleSource, HttpSourceConfig, TimeRange};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let source = Arc::new(HttpSampleSource::new(HttpSourceConfig::default())?);
//!     let controller = Arc::new(DashboardController::new(
//!         source,
//!         thermodash::dashboard::DEFAULT_POLL_INTERVAL,
//!         TimeRange::LastHour,
//!     ));
//!
//!     let poll = controller.start();
//!     let mut updates = controller.subscribe();
//!
//!     updates.changed().await?;
//!     println!("{} points", updates.borrow().point_count());
//!
//!     poll.shutdown().await;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod dashboard;
pub mod logging;
pub mod model;
pub mod source;
pub mod tui;

// Re-export top-level types for convenience
pub use model::{DashboardState, HealthReport, Sample, TimeRange};

pub use source::{
    FetchError, FetchResult, HttpSampleSource, HttpSourceConfig, SampleSource,
    FETCH_FAILURE_MESSAGE,
};

pub use dashboard::{DashboardController, FetchOutcome, PollHandle};

pub use config::{Config, ConfigError, LoggingConfig, PollingConfig, SourceConfig};

pub use logging::{init_logging, LogTarget};
