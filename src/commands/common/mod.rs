//! Shared setup for commands: configuration and backend construction.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::api::HttpBackend;
use crate::config::BoardConfig;

/// Load configuration, reporting where it came from on failure.
pub fn load_config(path: Option<&Path>) -> Result<BoardConfig> {
    BoardConfig::load(path).context(
        "Failed to load configuration (set DEAL_BOARD_API_URL and DEAL_BOARD_OWNER, or pass --config)",
    )
}

/// Build the HTTP backend for `config`.
pub fn connect(config: &BoardConfig) -> Result<Arc<HttpBackend>> {
    let backend = HttpBackend::new(config).context("Failed to set up backend client")?;
    Ok(Arc::new(backend))
}
