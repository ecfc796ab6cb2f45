//! Main TUI application.

use std::io;
use std::time::{Duration, Instant};

use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::{debug, info};

use crate::engine::TableEngine;
use crate::json::{JsonRecord, LoadError};

use super::event::{Event, EventHandler};
use super::input::{KeyAction, handle_key};
use super::render::render;
use super::state::AppState;

/// Poll interval for terminal events.
const TICK_RATE: Duration = Duration::from_millis(250);

/// Fetches a full replacement snapshot of the view's records.
pub type RecordSource = Box<dyn FnMut() -> Result<Vec<JsonRecord>, LoadError>>;

/// Main TUI application.
pub struct App {
    source: RecordSource,
    state: AppState,
    /// Periodic reload interval; `None` reloads only on demand.
    refresh_every: Option<Duration>,
    /// Page to open on once the first snapshot is in.
    start_page: usize,
    should_quit: bool,
}

impl App {
    pub fn new(
        title: impl Into<String>,
        engine: TableEngine<JsonRecord>,
        source: RecordSource,
    ) -> Self {
        Self {
            source,
            state: AppState::new(title, engine),
            refresh_every: None,
            start_page: 0,
            should_quit: false,
        }
    }

    pub fn with_refresh(mut self, every: Option<Duration>) -> Self {
        self.refresh_every = every;
        self
    }

    pub fn with_start_page(mut self, page: usize) -> Self {
        self.start_page = page;
        self
    }

    /// Runs the TUI application.
    pub fn run(mut self) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let events = EventHandler::new(TICK_RATE, self.refresh_every);

        // Show the loading state before the first fetch.
        terminal.draw(|frame| render(frame, &self.state))?;
        self.reload();
        self.state.engine.set_page(self.start_page);

        loop {
            terminal.draw(|frame| render(frame, &self.state))?;

            match events.next() {
                Ok(Event::Refresh) => self.reload(),
                Ok(Event::Key(key)) => match handle_key(&mut self.state, key) {
                    KeyAction::Quit => self.should_quit = true,
                    KeyAction::Reload => self.reload(),
                    KeyAction::None => {}
                },
                Ok(Event::Tick | Event::Redraw) => {}
                Err(_) => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        info!("tui closed");
        Ok(())
    }

    /// Fetches a fresh snapshot and hands it to the engine.
    fn reload(&mut self) {
        let started = Instant::now();
        let result = (self.source)();
        debug!(
            ok = result.is_ok(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "records fetched"
        );
        self.state.apply_records(result);
    }
}
