//! Optimistic moves awaiting confirmation, and how failures are undone.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How a rejected persist call is undone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RollbackPolicy {
    /// Replace the whole working copy with the last server list. Any other
    /// optimistic move still in flight is discarded along with the failed one.
    #[default]
    Snapshot,
    /// Revert only the failed deal, leaving other pending moves visible.
    PerDeal,
}

impl fmt::Display for RollbackPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RollbackPolicy::Snapshot => write!(f, "snapshot"),
            RollbackPolicy::PerDeal => write!(f, "per-deal"),
        }
    }
}

impl FromStr for RollbackPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "snapshot" => Ok(RollbackPolicy::Snapshot),
            "per-deal" | "per_deal" => Ok(RollbackPolicy::PerDeal),
            other => Err(format!(
                "Unknown rollback policy: {other}. Expected snapshot or per-deal"
            )),
        }
    }
}

/// One optimistic stage move that has been applied locally but not yet
/// confirmed by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMove {
    pub ticket: u64,
    pub deal_id: String,
    pub from_stage: Option<String>,
    pub to_stage: String,
}

/// Ordered list of pending moves, oldest first.
#[derive(Debug, Default)]
pub(crate) struct PendingMoves {
    moves: Vec<PendingMove>,
    next_ticket: u64,
}

impl PendingMoves {
    pub fn record(&mut self, deal_id: &str, from_stage: Option<String>, to_stage: &str) -> u64 {
        self.next_ticket += 1;
        let ticket = self.next_ticket;
        self.moves.push(PendingMove {
            ticket,
            deal_id: deal_id.to_string(),
            from_stage,
            to_stage: to_stage.to_string(),
        });
        ticket
    }

    /// Remove and return the move for `ticket`. `None` if it was already
    /// cleared by a resync.
    pub fn take(&mut self, ticket: u64) -> Option<PendingMove> {
        let index = self.moves.iter().position(|m| m.ticket == ticket)?;
        Some(self.moves.remove(index))
    }

    /// Most recent still-pending target stage for `deal_id`.
    pub fn latest_for(&self, deal_id: &str) -> Option<&PendingMove> {
        self.moves.iter().rev().find(|m| m.deal_id == deal_id)
    }

    pub fn clear(&mut self) {
        self.moves.clear();
    }

    pub fn as_slice(&self) -> &[PendingMove] {
        &self.moves
    }
}
