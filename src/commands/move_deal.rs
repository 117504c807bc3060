//! Move one deal to another stage without opening the board.
//! Usage: deal-board move <DEAL_ID> <STAGE_ID>
//!
//! Runs the same drag gesture the board does and waits for the outcome.

use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Result};
use colored::Colorize;

use super::common::{connect, load_config};
use crate::board::{BoardSession, DropOutcome, DropTarget, RollbackPolicy};

pub fn execute(config_path: Option<&Path>, deal_id: &str, stage_id: &str) -> Result<()> {
    let config = load_config(config_path)?;
    let backend = connect(&config)?;
    // Persist, plus the refresh a success triggers.
    let timeout = Duration::from_secs(config.request_timeout_secs.saturating_mul(2));

    let mut session = BoardSession::load(backend, &config.owner, RollbackPolicy::Snapshot);
    if let Some(notice) = session.notice() {
        bail!("{}", notice.message);
    }

    let Some(deal) = session.board().deal(deal_id).cloned() else {
        bail!("Deal '{deal_id}' not found");
    };
    if session.board().stage(stage_id).is_none() {
        bail!("Stage '{stage_id}' not found");
    }

    session.drag_start(deal_id);
    let target = DropTarget::Stage(stage_id.to_string());
    match session.drag_end(deal_id, Some(&target)) {
        DropOutcome::Moved(_) => {}
        DropOutcome::Unchanged => {
            println!("{} is already in '{stage_id}'", deal.label());
            return Ok(());
        }
        DropOutcome::Cancelled | DropOutcome::Unresolved => {
            bail!("Could not start moving '{deal_id}'");
        }
    }

    if !session.wait_idle(timeout) {
        bail!("Timed out waiting for the backend after {}s", timeout.as_secs());
    }

    let moved = session
        .board()
        .deal(deal_id)
        .is_some_and(|d| d.in_stage(stage_id));
    if let Some(notice) = session.notice() {
        if !moved {
            bail!("{}", notice.message);
        }
        eprintln!("{} {}", "warning:".yellow().bold(), notice.message);
    }

    let stage_name = session
        .board()
        .stage(stage_id)
        .map(|s| s.name.clone())
        .unwrap_or_else(|| stage_id.to_string());
    println!(
        "{} Moved {} to {}",
        "✓".green().bold(),
        deal.label().bold(),
        stage_name.bold()
    );
    Ok(())
}
