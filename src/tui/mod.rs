//! Interactive terminal board.
//!
//! Layout:
//! - Header with the pipeline name, working-copy totals and a sync spinner
//! - One column per stage, cards listed in working-copy order
//! - Footer with key hints, replaced by the current notice when there is one
//!
//! Dragging is keyboard driven: enter picks up the selected card, left/right
//! moves it across columns, enter drops it and esc cancels.

mod app;
mod event_handler;
mod renderer;
mod theme;

use anyhow::Result;

pub use app::TuiApp;
pub use event_handler::{handle_key_event, KeyAction};

use crate::board::BoardSession;
use crate::nav::NavState;

/// Entry point for the interactive board.
pub fn run_tui(session: BoardSession, nav: NavState) -> Result<()> {
    let mut app = TuiApp::new(session, nav)?;
    app.run()
}
