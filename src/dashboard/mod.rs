//! Dashboard core
//!
//! ## Architecture
//!
//! - **DashboardController**: owns the state, applies fetch results
//! - **PollHandle**: keeps the poll loop alive, tears it down on drop
//!
//! ## Data Flow
//!
//! 1. The poll loop ticks (immediately, then every interval)
//! 2. Each tick fetches the active range from the [`SampleSource`](crate::source::SampleSource)
//! 3. Fresh results replace the state; stale ones are dropped
//! 4. Presentation reads the state through a `watch` channel

mod controller;

pub use controller::{DashboardController, FetchOutcome, PollHandle, DEFAULT_POLL_INTERVAL};
