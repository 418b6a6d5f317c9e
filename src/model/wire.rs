//! Wire formats of the remote data source
//!
//! The backend speaks Spanish field names:
//!
//! ```json
//! { "datos": [ { "tiempo": "2024-01-01T12:00:00+00:00", "temperatura": 21.5 } ], "total": 1 }
//! ```

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::types::Sample;

/// Body of a successful samples request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplesResponse {
    pub datos: Vec<WireSample>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,
}

impl SamplesResponse {
    /// Convert into domain samples, keeping delivery order
    pub fn into_samples(self) -> Vec<Sample> {
        self.datos.into_iter().map(Sample::from).collect()
    }
}

/// One reading as delivered by the source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireSample {
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub tiempo: DateTime<Utc>,
    pub temperatura: f64,
}

impl From<WireSample> for Sample {
    fn from(wire: WireSample) -> Self {
        Sample::new(wire.tiempo, wire.temperatura)
    }
}

/// Error body returned with non-2xx responses
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Body of `GET /health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    /// Whether the backend reports a live connection to its store
    #[serde(default, rename = "influxdb_conectado")]
    pub store_connected: Option<bool>,
}

impl HealthReport {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Millis(i64),
    Text(String),
}

/// Accepts RFC 3339, naive ISO 8601 (treated as UTC) or Unix milliseconds
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    match RawTimestamp::deserialize(deserializer)? {
        RawTimestamp::Millis(ms) => DateTime::from_timestamp_millis(ms)
            .ok_or_else(|| serde::de::Error::custom(format!("timestamp out of range: {}", ms))),
        RawTimestamp::Text(s) => parse_timestamp(&s).map_err(serde::de::Error::custom),
    }
}

/// Parse a textual timestamp as sent by the source
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|_| format!("invalid timestamp: {}", s))
}
