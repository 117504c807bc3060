pub mod board;
pub mod common;
pub mod config_cmd;
pub mod list;
pub mod move_deal;
pub mod stages;
