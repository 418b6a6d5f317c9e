//! Widgets for the temperature dashboard.
//!
//! - [`StatCard`] - Labeled summary value (count, latest, average)
//! - [`TemperatureChart`] - Line chart of the current samples

use chrono::{DateTime, Local, Utc};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use crate::model::Sample;

// ── StatCard ────────────────────────────────────────────────────────────────

/// A bordered card showing one labeled value.
pub struct StatCard {
    pub label: String,
    pub value: String,
    pub color: Color,
}

impl StatCard {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            color: Color::Cyan,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        let paragraph = Paragraph::new(Line::from(Span::styled(
            self.value.as_str(),
            Style::default()
                .fg(self.color)
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", self.label)),
        );
        f.render_widget(paragraph, area);
    }
}

// ── TemperatureChart ────────────────────────────────────────────────────────

/// Line chart of temperature over time.
pub struct TemperatureChart<'a> {
    pub samples: &'a [Sample],
    pub bounds: Option<(f64, f64)>,
}

impl<'a> TemperatureChart<'a> {
    pub fn new(samples: &'a [Sample], bounds: Option<(f64, f64)>) -> Self {
        Self { samples, bounds }
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Real-time temperature ");

        if self.samples.is_empty() {
            let loading = Paragraph::new("Loading data...")
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            f.render_widget(loading, area);
            return;
        }

        let points = chart_points(self.samples);
        let x = x_bounds(&points);
        let y = y_bounds(self.bounds);

        let dataset = Dataset::default()
            .name("Temperature (°C)")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Cyan))
            .data(&points);

        let x_labels: Vec<Span> = time_labels(self.samples)
            .into_iter()
            .map(Span::raw)
            .collect();
        let y_labels: Vec<Span> = [y[0], (y[0] + y[1]) / 2.0, y[1]]
            .iter()
            .map(|v| Span::raw(format!("{:.1}", v)))
            .collect();

        let chart = Chart::new(vec![dataset])
            .block(block)
            .x_axis(
                Axis::default()
                    .title("Time")
                    .style(Style::default().fg(Color::Gray))
                    .bounds(x)
                    .labels(x_labels),
            )
            .y_axis(
                Axis::default()
                    .title("°C")
                    .style(Style::default().fg(Color::Gray))
                    .bounds(y)
                    .labels(y_labels),
            );
        f.render_widget(chart, area);
    }
}

/// (seconds since epoch, temperature) pairs in arrival order.
pub fn chart_points(samples: &[Sample]) -> Vec<(f64, f64)> {
    samples
        .iter()
        .map(|s| (s.timestamp.timestamp_millis() as f64 / 1000.0, s.temperature))
        .collect()
}

/// X axis bounds covering all points; widened when there is only one instant.
pub fn x_bounds(points: &[(f64, f64)]) -> [f64; 2] {
    let min = points.iter().map(|p| p.0).fold(f64::INFINITY, f64::min);
    let max = points.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max);

    if !min.is_finite() || !max.is_finite() {
        return [0.0, 1.0];
    }
    if max - min < f64::EPSILON {
        return [min - 1.0, max + 1.0];
    }
    [min, max]
}

/// Y axis bounds with one degree of headroom on each side.
pub fn y_bounds(bounds: Option<(f64, f64)>) -> [f64; 2] {
    match bounds {
        Some((min, max)) => [(min - 1.0).floor(), (max + 1.0).ceil()],
        None => [0.0, 100.0],
    }
}

/// Local clock labels for the first, middle and last sample.
pub fn time_labels(samples: &[Sample]) -> Vec<String> {
    let (Some(first), Some(last)) = (samples.first(), samples.last()) else {
        return Vec::new();
    };
    let middle = &samples[samples.len() / 2];

    [first.timestamp, middle.timestamp, last.timestamp]
        .iter()
        .map(clock_label)
        .collect()
}

/// Format a timestamp as a local wall-clock time.
pub fn clock_label(ts: &DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%H:%M:%S").to_string()
}

// ── Tests ───────────────────────────────────────────────────────────────────
