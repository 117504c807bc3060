//! Print the board as text.
//! Usage: deal-board list [--client-type buyer|seller]

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;

use super::common::{connect, load_config};
use crate::board::{fetch_snapshot, PipelineBoard};
use crate::models::ClientType;
use crate::utils::{format_money, truncate};

const TITLE_WIDTH: usize = 40;

/// Fetch and print the grouped board.
pub fn execute(config_path: Option<&Path>, client_type: Option<ClientType>) -> Result<()> {
    let config = load_config(config_path)?;
    let backend = connect(&config)?;
    let view = client_type.unwrap_or(config.client_type);

    let snapshot =
        fetch_snapshot(backend.as_ref(), &config.owner).context("Failed to fetch pipeline")?;
    let board = PipelineBoard::new(snapshot.stages, snapshot.deals, config.rollback);

    print_board(&board, view);
    Ok(())
}

/// Print columns for `view` followed by working-copy totals.
pub fn print_board(board: &PipelineBoard, view: ClientType) {
    let columns = board.columns_for(view);

    println!("{} pipeline", view.to_string().bold());
    println!("─────────────────────────────────────────────────────────");

    if columns.is_empty() {
        println!("(no {view} stages)");
    }

    for column in &columns {
        let totals = column.totals();
        println!(
            "{} {} {}",
            column.stage.name.bold(),
            format!("({})", totals.count).dimmed(),
            format_money(totals.value).green()
        );

        if column.deals.is_empty() {
            println!("  {}", "(empty)".dimmed());
        }
        for deal in &column.deals {
            let price = deal
                .price
                .map(format_money)
                .unwrap_or_else(|| "-".to_string());
            println!(
                "  {:<width$} {:>12}  {}",
                truncate(deal.label(), TITLE_WIDTH),
                price,
                deal.id.dimmed(),
                width = TITLE_WIDTH
            );
        }
        println!();
    }

    let totals = board.totals();
    println!(
        "{} {} deals, {}",
        "Total:".bold(),
        totals.count,
        format_money(totals.value).green()
    );
}
