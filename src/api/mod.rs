//! Collaborator interfaces for the deals and stages backend.
//!
//! The board never talks HTTP directly. It goes through [`DealsApi`] and
//! [`StagesApi`], implemented by [`HttpBackend`] in production and by
//! in-memory fakes in tests.

pub mod http;
pub mod payload;

use crate::error::ApiError;
use crate::models::{Deal, DealUpdate, Stage};

pub use http::HttpBackend;

/// Deal persistence.
pub trait DealsApi: Send + Sync {
    /// All deals belonging to `owner`.
    fn list_deals(&self, owner: &str) -> Result<Vec<Deal>, ApiError>;

    /// Replace the stored record for `deal_id` with `update`.
    ///
    /// Full-record semantics: either the whole record is written or nothing.
    fn update_deal(&self, deal_id: &str, update: &DealUpdate) -> Result<(), ApiError>;
}

/// Pipeline stage lookup.
pub trait StagesApi: Send + Sync {
    fn list_stages(&self, owner: &str) -> Result<Vec<Stage>, ApiError>;
}

/// Everything the board needs from the backend.
pub trait Backend: DealsApi + StagesApi {}

impl<T: DealsApi + StagesApi> Backend for T {}
