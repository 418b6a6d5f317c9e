//! Terminal Dashboard
//!
//! ratatui front end for the [`DashboardController`](crate::dashboard::DashboardController).
//!
//! # Architecture
//!
//! - [`app`] - Presentation state, key handling and the event loop
//! - [`ui`] - Layout rendering
//! - [`widgets`] - Chart and summary card widgets
//!
//! # Keys
//!
//! - `1`/`2`/`3` - Last hour / 6 hours / 24 hours
//! - `Tab` or `→` - Next range
//! - `q` or `Esc` - Quit

pub mod app;
pub mod ui;
pub mod widgets;

pub use app::{run, App};
