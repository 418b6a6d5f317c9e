//! Sample sources
//!
//! The dashboard only talks to its data through [`SampleSource`], so the
//! controller can be driven by the real HTTP backend or by a scripted
//! source in tests.

mod error;
mod http;

pub use error::{FetchError, FetchResult, FETCH_FAILURE_MESSAGE};
pub use http::{HttpSampleSource, HttpSourceConfig};

use async_trait::async_trait;

use crate::model::{Sample, TimeRange};

/// Something that can return the samples for a time range
#[async_trait]
pub trait SampleSource: Send + Sync {
    /// Fetch all samples for `range`, in the order the source keeps them
    async fn fetch(&self, range: TimeRange) -> FetchResult<Vec<Sample>>;

    /// Short description for logs (usually the endpoint URL)
    fn describe(&self) -> String {
        "sample source".to_string()
    }
}
