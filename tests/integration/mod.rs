//! Integration tests for the deal board
//!
//! These tests drive the board through its backend seam: an in-memory fake
//! for session flows, and a one-shot local HTTP server for the wire format.

pub mod helpers;
pub mod http_backend;
pub mod session_flow;
