//! Print pipeline stages in column order.

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;

use super::common::{connect, load_config};
use crate::api::StagesApi;
use crate::models::sort_stages;

pub fn execute(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let backend = connect(&config)?;

    let mut stages = backend
        .list_stages(&config.owner)
        .context("Failed to fetch stages")?;
    sort_stages(&mut stages);

    if stages.is_empty() {
        println!("(no stages)");
        return Ok(());
    }

    println!("{:<6} {:<8} {:<20} {}", "ORDER", "TYPE", "ID", "NAME");
    for stage in &stages {
        println!(
            "{:<6} {:<8} {:<20} {}",
            stage.order,
            stage.client_type.to_string(),
            stage.id.dimmed(),
            stage.name
        );
    }
    Ok(())
}
