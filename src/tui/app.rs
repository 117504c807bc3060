//! TUI application state and main loop.

use std::io::{self, Stdout};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};
use tracing::debug;

use super::event_handler::{handle_key_event, KeyAction};
use super::renderer::{
    render_columns, render_footer, render_header, CARD_HEIGHT, FOOTER_HEIGHT, HEADER_HEIGHT,
};
use crate::board::{BoardSession, DropOutcome, DropTarget, Notice};
use crate::nav::NavState;

/// Poll timeout for the event loop; also bounds how late a completion is
/// noticed.
const POLL_TIMEOUT: Duration = Duration::from_millis(100);

/// Shown in the header while calls are in flight.
const SPINNER: [char; 4] = ['|', '/', '-', '\\'];

/// Interactive pipeline board.
pub struct TuiApp {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    running: Arc<AtomicBool>,
    session: BoardSession,
    nav: NavState,
    spinner_frame: usize,
    exiting: bool,
    /// Set once the terminal has been restored.
    restored: bool,
}

impl TuiApp {
    /// Take over the terminal.
    pub fn new(session: BoardSession, nav: NavState) -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;

        crate::utils::install_crossterm_panic_hook();

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend).context("Failed to create terminal")?;

        Ok(Self {
            terminal,
            running: Arc::new(AtomicBool::new(true)),
            session,
            nav,
            spinner_frame: 0,
            exiting: false,
            restored: false,
        })
    }

    /// Run the event loop until the user quits.
    pub fn run(&mut self) -> Result<()> {
        let running = self.running.clone();
        ctrlc::set_handler(move || {
            running.store(false, Ordering::SeqCst);
            crate::utils::cleanup_terminal_crossterm();
            std::process::exit(0);
        })
        .context("Failed to set Ctrl+C handler")?;

        let result = self.run_event_loop();
        self.restore_terminal();
        result
    }

    fn run_event_loop(&mut self) -> Result<()> {
        while self.running.load(Ordering::SeqCst) && !self.exiting {
            if self.session.pump() > 0 {
                let lens = self.column_lens();
                self.nav.clamp(&lens);
            }

            self.render()?;

            if event::poll(POLL_TIMEOUT)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        let lens = self.column_lens();
                        let action = handle_key_event(key.code, key.modifiers, &mut self.nav, &lens);
                        self.handle_action(action);
                    }
                }
            }

            self.spinner_frame = self.spinner_frame.wrapping_add(1);
        }

        Ok(())
    }

    fn handle_action(&mut self, action: KeyAction) {
        match action {
            KeyAction::Exit => self.exiting = true,
            KeyAction::Continue => {}
            KeyAction::PickUp => self.pick_up(),
            KeyAction::Drop => self.drop_active(),
            KeyAction::Cancel => self.cancel_drag(),
            KeyAction::Refresh => {
                self.session.refresh();
                self.session.set_notice(Notice::info("Refreshing..."));
            }
        }
    }

    /// Card count of each visible column.
    fn column_lens(&self) -> Vec<usize> {
        self.session
            .board()
            .columns_for(self.nav.view)
            .iter()
            .map(|c| c.deals.len())
            .collect()
    }

    fn selected_deal_id(&self) -> Option<String> {
        let columns = self.session.board().columns_for(self.nav.view);
        let column = columns.get(self.nav.column)?;
        column.deals.get(self.nav.row).map(|d| d.id.clone())
    }

    fn hovered_stage_id(&self, hover: usize) -> Option<String> {
        let columns = self.session.board().columns_for(self.nav.view);
        columns.get(hover).map(|c| c.stage.id.clone())
    }

    fn active_deal_id(&self) -> Option<String> {
        self.session.board().active_deal().map(|d| d.id.clone())
    }

    fn pick_up(&mut self) {
        let Some(deal_id) = self.selected_deal_id() else {
            return;
        };
        self.session.drag_start(&deal_id);
        if self.session.board().active_deal().is_some() {
            self.nav.begin_drag();
        }
    }

    fn drop_active(&mut self) {
        let Some(deal_id) = self.active_deal_id() else {
            self.nav.cancel_drag();
            return;
        };
        let target = self
            .nav
            .finish_drag()
            .and_then(|hover| self.hovered_stage_id(hover))
            .map(DropTarget::Stage);

        let outcome = self.session.drag_end(&deal_id, target.as_ref());
        debug!(deal_id = %deal_id, ?outcome, "drop handled");

        if matches!(outcome, DropOutcome::Moved(_)) {
            self.select_deal(&deal_id);
        }
        let lens = self.column_lens();
        self.nav.clamp(&lens);
    }

    fn cancel_drag(&mut self) {
        self.nav.cancel_drag();
        if let Some(deal_id) = self.active_deal_id() {
            self.session.drag_end(&deal_id, None);
        }
    }

    /// Move the cursor onto `deal_id` in its current column.
    fn select_deal(&mut self, deal_id: &str) {
        let columns = self.session.board().columns_for(self.nav.view);
        for (column_index, column) in columns.iter().enumerate() {
            if let Some(row) = column.deals.iter().position(|d| d.id == deal_id) {
                self.nav.column = column_index;
                self.nav.row = row;
                return;
            }
        }
    }

    fn restore_terminal(&mut self) {
        if self.restored {
            return;
        }
        self.restored = true;

        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }

    fn render(&mut self) -> Result<()> {
        let size = self.terminal.size()?;
        let columns_height = size
            .height
            .saturating_sub(HEADER_HEIGHT + FOOTER_HEIGHT + 2);
        self.nav
            .ensure_visible((columns_height / CARD_HEIGHT) as usize);

        let spinner = self.spinner_char();
        let in_flight = self.session.in_flight();
        let notice = self.session.notice().cloned();
        let board = self.session.board();
        let nav = &self.nav;
        let columns = board.columns_for(nav.view);
        let totals = board.totals();
        let active = board.active_deal();

        self.terminal.draw(|frame| {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(HEADER_HEIGHT),
                    Constraint::Min(4),
                    Constraint::Length(FOOTER_HEIGHT),
                ])
                .split(frame.area());

            render_header(frame, chunks[0], nav.view, totals, in_flight, spinner);
            render_columns(frame, chunks[1], &columns, nav, active);
            render_footer(frame, chunks[2], notice.as_ref(), nav.is_dragging());
        })?;

        Ok(())
    }

    fn spinner_char(&self) -> char {
        SPINNER[self.spinner_frame % SPINNER.len()]
    }
}

impl Drop for TuiApp {
    fn drop(&mut self) {
        self.restore_terminal();
    }
}
