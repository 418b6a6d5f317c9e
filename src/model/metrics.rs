//! Derived metrics
//!
//! Pure functions over a sample slice. `None` means the value is
//! unavailable (no samples).

use super::types::Sample;

/// Number of samples
pub fn point_count(samples: &[Sample]) -> usize {
    samples.len()
}

/// Temperature of the last sample in arrival order
pub fn latest_temperature(samples: &[Sample]) -> Option<f64> {
    samples.last().map(|s| s.temperature)
}

/// Arithmetic mean of all temperatures, rounded to 2 decimal places
pub fn average_temperature(samples: &[Sample]) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }

    let sum: f64 = samples.iter().map(|s| s.temperature).sum();
    Some(round2(sum / samples.len() as f64))
}

/// Lowest and highest temperature
pub fn temperature_bounds(samples: &[Sample]) -> Option<(f64, f64)> {
    if samples.is_empty() {
        return None;
    }

    let min = samples
        .iter()
        .map(|s| s.temperature)
        .fold(f64::INFINITY, f64::min);
    let max = samples
        .iter()
        .map(|s| s.temperature)
        .fold(f64::NEG_INFINITY, f64::max);

    Some((min, max))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Render an optional temperature, using `--` when unavailable
pub fn format_temperature(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}°C", v),
        None => "--".to_string(),
    }
}
