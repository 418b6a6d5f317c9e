//! HTTP sample source
//!
//! reqwest client for the backend's samples and health endpoints.

use async_trait::async_trait;
use reqwest::{Client, Response};
use std::time::Duration;
use uuid::Uuid;

use super::error::{FetchError, FetchResult};
use super::SampleSource;
use crate::model::wire::{ErrorBody, HealthReport, SamplesResponse};
use crate::model::{Sample, TimeRange};

/// Connection settings for [`HttpSampleSource`]
#[derive(Debug, Clone)]
pub struct HttpSourceConfig {
    /// Base URL of the backend (e.g., "http://localhost:5000")
    pub base_url: String,
    /// Path of the samples endpoint
    pub data_path: String,
    /// Name of the query parameter carrying the range
    pub range_param: String,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for HttpSourceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            data_path: "/api/data".to_string(),
            range_param: "range".to_string(),
            request_timeout_ms: 5000,
        }
    }
}

/// Remote sample source over HTTP
pub struct HttpSampleSource {
    client: Client,
    config: HttpSourceConfig,
}

impl HttpSampleSource {
    /// Create a new source with the given configuration
    pub fn new(config: HttpSourceConfig) -> FetchResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;

        Ok(Self { client, config })
    }

    /// Get the current configuration
    pub fn config(&self) -> &HttpSourceConfig {
        &self.config
    }

    fn base_url(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    /// URL of the samples endpoint, without the query string
    pub fn data_url(&self) -> String {
        let path = self.config.data_path.trim_start_matches('/');
        format!("{}/{}", self.base_url(), path)
    }

    /// Query the backend's health endpoint
    pub async fn health(&self) -> FetchResult<HealthReport> {
        let url = format!("{}/health", self.base_url());

        let response = self.client.get(&url).send().await.map_err(map_transport)?;
        let response = check_status(response).await?;
        let body = response.text().await.map_err(map_transport)?;

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl SampleSource for HttpSampleSource {
    async fn fetch(&self, range: TimeRange) -> FetchResult<Vec<Sample>> {
        let request_id = Uuid::new_v4();
        let url = self.data_url();

        tracing::debug!(request_id = %request_id, url = %url, range = %range, "Fetching samples");

        let response = self
            .client
            .get(&url)
            .query(&[(self.config.range_param.as_str(), range.as_query())])
            .send()
            .await
            .map_err(map_transport)?;

        let response = check_status(response).await?;
        let body = response.text().await.map_err(map_transport)?;
        let parsed: SamplesResponse = serde_json::from_str(&body)?;

        if let Some(total) = parsed.total {
            if total != parsed.datos.len() {
                tracing::warn!(
                    request_id = %request_id,
                    total,
                    received = parsed.datos.len(),
                    "Reported total differs from samples received"
                );
            }
        }

        let samples = parsed.into_samples();
        tracing::debug!(request_id = %request_id, points = samples.len(), "Samples received");

        Ok(samples)
    }

    fn describe(&self) -> String {
        self.data_url()
    }
}

fn map_transport(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout
    } else if e.is_connect() {
        FetchError::Unavailable(e.to_string())
    } else if e.is_decode() {
        FetchError::Decode(e.to_string())
    } else {
        FetchError::Request(e)
    }
}

/// Turn non-2xx responses into errors, keeping the backend's message
async fn check_status(response: Response) -> FetchResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|b| b.error)
        .unwrap_or(text);

    Err(FetchError::Status {
        status: status.as_u16(),
        message,
    })
}
