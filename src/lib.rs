pub mod api;
pub mod board;
pub mod commands;
pub mod completions;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod nav;
pub mod tui;
pub mod utils;
