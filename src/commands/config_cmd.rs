//! Show the effective configuration with secrets masked.

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;

use super::common::load_config;
use crate::config::BoardConfig;

pub fn execute(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;

    let source = config_path
        .map(Path::to_path_buf)
        .or_else(BoardConfig::default_path)
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(none)".to_string());
    println!("{} {}", "# file:".dimmed(), source.dimmed());

    let rendered =
        toml::to_string_pretty(&config.redacted()).context("Failed to render configuration")?;
    print!("{rendered}");
    Ok(())
}
