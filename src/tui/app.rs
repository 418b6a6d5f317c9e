//! Application state and main event loop for the terminal dashboard.
//!
//! [`App`] mirrors the controller's state and translates key presses into
//! controller actions. [`run`] owns the terminal and the poll loop.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::watch;

use super::ui;
use crate::dashboard::DashboardController;
use crate::model::{DashboardState, TimeRange};

/// How long to wait for a key press before redrawing.
const INPUT_POLL: Duration = Duration::from_millis(100);

/// All presentation state for the terminal dashboard.
pub struct App {
    controller: Arc<DashboardController>,
    state_rx: watch::Receiver<DashboardState>,
    pub state: DashboardState,
    pub should_quit: bool,
}

impl App {
    pub fn new(controller: Arc<DashboardController>) -> Self {
        let mut state_rx = controller.subscribe();
        let state = state_rx.borrow_and_update().clone();

        Self {
            controller,
            state_rx,
            state,
            should_quit: false,
        }
    }

    /// Pull the latest controller state if it changed. Returns `true` on change.
    pub fn refresh(&mut self) -> bool {
        match self.state_rx.has_changed() {
            Ok(true) => {
                self.state = self.state_rx.borrow_and_update().clone();
                true
            }
            _ => false,
        }
    }

    /// Handle a key press.
    pub fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('1') => self.select_range(TimeRange::LastHour),
            KeyCode::Char('2') => self.select_range(TimeRange::Last6Hours),
            KeyCode::Char('3') => self.select_range(TimeRange::Last24Hours),
            KeyCode::Tab | KeyCode::Right => self.select_range(self.state.active_range.next()),
            _ => {}
        }
    }

    fn select_range(&mut self, range: TimeRange) {
        if self.controller.set_active_range(range) {
            self.refresh();
        }
    }
}

/// Run the dashboard until the user quits.
///
/// The poll loop runs for exactly as long as the terminal is owned; the
/// terminal is restored even when drawing fails.
pub async fn run(controller: Arc<DashboardController>) -> io::Result<()> {
    let poll = controller.start();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(controller);
    let result = event_loop(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    poll.shutdown().await;
    result
}

fn event_loop<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        app.refresh();
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(INPUT_POLL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key.code);
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::DEFAULT_POLL_INTERVAL;
    use crate::model::Sample;
    use crate::source::{FetchResult, SampleSource};
    use async_trait::async_trait;
    use chrono::Utc;

    struct FixedSource;

    #[async_trait]
    impl SampleSource for FixedSource {
        async fn fetch(&self, _range: TimeRange) -> FetchResult<Vec<Sample>> {
            Ok(vec![Sample::new(Utc::now(), 23.5)])
        }
    }

    fn app() -> App {
        let controller = Arc::new(DashboardController::new(
            Arc::new(FixedSource),
            DEFAULT_POLL_INTERVAL,
            TimeRange::LastHour,
        ));
        App::new(controller)
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app();
        app.handle_key(KeyCode::Char('x'));
        assert!(!app.should_quit);

        app.handle_key(KeyCode::Char('q'));
        assert!(app.should_quit);

        let mut app = self::app();
        app.handle_key(KeyCode::Esc);
        assert!(app.should_quit);
    }

    #[test]
    fn test_number_keys_select_range() {
        let mut app = app();

        app.handle_key(KeyCode::Char('3'));
        assert_eq!(app.state.active_range, TimeRange::Last24Hours);

        app.handle_key(KeyCode::Char('2'));
        assert_eq!(app.state.active_range, TimeRange::Last6Hours);

        app.handle_key(KeyCode::Char('1'));
        assert_eq!(app.state.active_range, TimeRange::LastHour);
    }

    #[test]
    fn test_tab_cycles_ranges() {
        let mut app = app();

        app.handle_key(KeyCode::Tab);
        assert_eq!(app.state.active_range, TimeRange::Last6Hours);
        app.handle_key(KeyCode::Tab);
        assert_eq!(app.state.active_range, TimeRange::Last24Hours);
        app.handle_key(KeyCode::Right);
        assert_eq!(app.state.active_range, TimeRange::LastHour);
    }

    #[tokio::test]
    async fn test_refresh_picks_up_fetches() {
        let mut app = app();
        assert!(!app.refresh());
        assert_eq!(app.state.point_count(), 0);

        app.controller.fetch_once().await;

        assert!(app.refresh());
        assert_eq!(app.state.latest_temperature(), Some(23.5));
    }
}
