//! Interactive terminal dashboard and its event loop.
//!
//! [`App`] owns the theme, the [`DashboardSession`] and the aggregates for the
//! current selection. Each key press that changes a filter re-runs filter and
//! aggregate against the shared table; redraws in between reuse the result.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use macbar_core::error::{DashboardError, Result};
use macbar_data::aggregator::Aggregates;
use macbar_runtime::session::DashboardSession;
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::debug;

use crate::render::{Renderer, TerminalRenderer};
use crate::themes::Theme;

// ── App ───────────────────────────────────────────────────────────────────────

/// Root application state for the terminal dashboard.
pub struct App {
    pub theme: Theme,
    pub session: DashboardSession,
    /// Aggregates for the session's current selection.
    pub aggregates: Aggregates,
    /// Set to `true` to break out of the event loop on the next iteration.
    pub should_quit: bool,
}

impl App {
    pub fn new(theme_name: &str, session: DashboardSession) -> Self {
        let aggregates = session.aggregates();
        Self {
            theme: Theme::from_name(theme_name),
            session,
            aggregates,
            should_quit: false,
        }
    }

    // ── Event loop ────────────────────────────────────────────────────────────

    /// Run the dashboard until `q`, `Q` or `Ctrl+C`.
    ///
    /// Blocks the calling thread, polling the keyboard every 250 ms. The
    /// terminal is restored even when drawing fails.
    pub fn run(mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        let mut renderer = TerminalRenderer::new(terminal, self.theme.clone());

        let result = self.event_loop(&mut renderer);

        disable_raw_mode()?;
        let terminal = renderer.terminal_mut();
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    fn event_loop<R: Renderer>(&mut self, renderer: &mut R) -> Result<()> {
        let tick_rate = Duration::from_millis(250);

        while !self.should_quit {
            renderer.render(&self.aggregates, &self.session.selections())?;

            if event::poll(tick_rate).map_err(terminal_error)? {
                if let Event::Key(key) = event::read().map_err(terminal_error)? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key);
                    }
                }
            }
        }
        Ok(())
    }

    // ── Input ─────────────────────────────────────────────────────────────────

    /// Apply one key press. Returns `true` when the selection changed.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
                false
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
                false
            }
            KeyCode::Char('m') => self.update(|s| s.cycle_month(1)),
            KeyCode::Char('M') => self.update(|s| s.cycle_month(-1)),
            KeyCode::Char('d') => self.update(|s| s.cycle_day(1)),
            KeyCode::Char('D') => self.update(|s| s.cycle_day(-1)),
            KeyCode::Char('r') | KeyCode::Char('R') => self.update(DashboardSession::reset_filters),
            _ => false,
        }
    }

    fn update(&mut self, change: impl FnOnce(&mut DashboardSession)) -> bool {
        let before = self.session.selections();
        change(&mut self.session);
        let after = self.session.selections();
        if before == after {
            return false;
        }

        self.aggregates = self.session.aggregates();
        debug!(
            "Selection month={} day={}: {} rows",
            after.month, after.day, self.aggregates.row_count
        );
        true
    }
}

fn terminal_error(e: io::Error) -> DashboardError {
    DashboardError::Terminal(e.to_string())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
