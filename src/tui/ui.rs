//! Layout and rendering for the terminal dashboard.
//!
//! Top to bottom: title with connection status, range selector, chart,
//! summary cards and a key help line.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

use super::app::App;
use super::widgets::{clock_label, StatCard, TemperatureChart};
use crate::model::{format_temperature, DashboardState, TimeRange};

/// Top-level rendering function.
pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title + status
            Constraint::Length(3), // Range selector
            Constraint::Min(8),    // Chart
            Constraint::Length(3), // Summary cards
            Constraint::Length(1), // Help
        ])
        .split(f.area());

    draw_header(f, &app.state, chunks[0]);
    draw_ranges(f, app.state.active_range, chunks[1]);
    TemperatureChart::new(&app.state.samples, app.state.temperature_bounds()).render(f, chunks[2]);
    draw_summary(f, &app.state, chunks[3]);
    draw_help(f, chunks[4]);
}

/// Connection indicator: the error banner replaces the connected status.
pub fn status_line(state: &DashboardState) -> (String, Style) {
    if let Some(error) = &state.error {
        return (
            format!("⚠ {}", error),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        );
    }

    match &state.last_updated {
        Some(ts) => (
            format!("● Connected | Last update: {}", clock_label(ts)),
            Style::default().fg(Color::Green),
        ),
        None => (
            "○ Connecting...".to_string(),
            Style::default().fg(Color::Yellow),
        ),
    }
}

fn draw_header(f: &mut Frame, state: &DashboardState, area: Rect) {
    let (text, style) = status_line(state);

    let header = Paragraph::new(Line::from(Span::styled(text, style)))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Temperature Dashboard ")
                .title_alignment(Alignment::Center),
        );
    f.render_widget(header, area);
}

fn draw_ranges(f: &mut Frame, active: TimeRange, area: Rect) {
    let titles: Vec<Line> = TimeRange::all()
        .iter()
        .map(|r| {
            let style = if *r == active {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            Line::from(Span::styled(
                format!("{} {}", r.index() + 1, r.label()),
                style,
            ))
        })
        .collect();

    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL).title(" Range "))
        .select(active.index())
        .highlight_style(Style::default().fg(Color::Cyan));
    f.render_widget(tabs, area);
}

fn draw_summary(f: &mut Frame, state: &DashboardState, area: Rect) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    StatCard::new("Data points", state.point_count().to_string())
        .with_color(Color::Blue)
        .render(f, cards[0]);
    StatCard::new(
        "Current temperature",
        format_temperature(state.latest_temperature()),
    )
    .with_color(Color::Yellow)
    .render(f, cards[1]);
    StatCard::new(
        "Average temperature",
        format_temperature(state.average_temperature()),
    )
    .with_color(Color::Magenta)
    .render(f, cards[2]);
}

fn draw_help(f: &mut Frame, area: Rect) {
    let help = Paragraph::new(Line::from(vec![
        Span::styled(" 1/2/3 ", Style::default().fg(Color::Cyan)),
        Span::raw("range  "),
        Span::styled(" Tab ", Style::default().fg(Color::Cyan)),
        Span::raw("next range  "),
        Span::styled(" q ", Style::default().fg(Color::Cyan)),
        Span::raw("quit"),
    ]))
    .style(Style::default().fg(Color::DarkGray));
    f.render_widget(help, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::{DashboardController, DEFAULT_POLL_INTERVAL};
    use crate::model::Sample;
    use crate::source::{FetchResult, SampleSource, FETCH_FAILURE_MESSAGE};
    use async_trait::async_trait;
    use chrono::Utc;
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;

    struct EmptySource;

    #[async_trait]
    impl SampleSource for EmptySource {
        async fn fetch(&self, _range: TimeRange) -> FetchResult<Vec<Sample>> {
            Ok(Vec::new())
        }
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_status_line_variants() {
        let mut state = DashboardState::default();
        let (text, _) = status_line(&state);
        assert!(text.contains("Connecting"));

        state.last_updated = Some(Utc::now());
        let (text, style) = status_line(&state);
        assert!(text.starts_with("● Connected | Last update: "));
        assert_eq!(style.fg, Some(Color::Green));

        state.error = Some(FETCH_FAILURE_MESSAGE.to_string());
        let (text, style) = status_line(&state);
        assert_eq!(text, format!("⚠ {}", FETCH_FAILURE_MESSAGE));
        assert_eq!(style.fg, Some(Color::Red));
    }

    #[test]
    fn test_draw_full_dashboard() {
        let controller = Arc::new(DashboardController::new(
            Arc::new(EmptySource),
            DEFAULT_POLL_INTERVAL,
            TimeRange::LastHour,
        ));
        let mut app = App::new(controller);
        app.state.samples = vec![
            Sample::new(Utc::now() - chrono::Duration::seconds(5), 20.0),
            Sample::new(Utc::now(), 22.0),
        ];
        app.state.last_updated = Some(Utc::now());

        let mut terminal = Terminal::new(TestBackend::new(100, 30)).expect("failed to create terminal");
        terminal.draw(|f| draw(f, &app)).expect("failed to draw");

        let text = buffer_text(&terminal);
        assert!(text.contains("Temperature Dashboard"));
        assert!(text.contains("Last hour"));
        assert!(text.contains("21.00°C"));
        assert!(text.contains("22.00°C"));
    }

    #[test]
    fn test_draw_empty_shows_placeholders() {
        let controller = Arc::new(DashboardController::new(
            Arc::new(EmptySource),
            DEFAULT_POLL_INTERVAL,
            TimeRange::Last6Hours,
        ));
        let app = App::new(controller);

        let mut terminal = Terminal::new(TestBackend::new(100, 30)).expect("failed to create terminal");
        terminal.draw(|f| draw(f, &app)).expect("failed to draw");

        let text = buffer_text(&terminal);
        assert!(text.contains("Loading data..."));
        assert!(text.contains("--"));
    }
}
