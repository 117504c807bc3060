//! Open the interactive board.
//! Usage: deal-board board [--client-type buyer|seller] [--rollback snapshot|per-deal]

use std::path::{Path, PathBuf};

use anyhow::Result;
use colored::Colorize;

use super::common::{connect, load_config};
use crate::board::{BoardSession, RollbackPolicy};
use crate::logging::{self, LogTarget};
use crate::models::ClientType;
use crate::nav::NavState;
use crate::tui::run_tui;

pub fn execute(
    config_path: Option<&Path>,
    client_type: Option<ClientType>,
    rollback: Option<RollbackPolicy>,
) -> Result<()> {
    if let Some(path) = logging::default_log_path() {
        start_file_logging(path);
    }

    let config = load_config(config_path)?;
    let backend = connect(&config)?;
    let policy = rollback.unwrap_or(config.rollback);

    let session = BoardSession::load(backend, &config.owner, policy);
    let nav = NavState::new(client_type.unwrap_or(config.client_type));

    run_tui(session, nav)
}

/// Send logs to `path` while the TUI owns the terminal. When the file cannot
/// be opened the board runs without logging. Returns whether logging started.
fn start_file_logging(path: PathBuf) -> bool {
    match logging::init(LogTarget::File(path)) {
        Ok(()) => true,
        Err(e) => {
            eprintln!("{} logging disabled: {e:#}", "warning:".yellow().bold());
            false
        }
    }
}
