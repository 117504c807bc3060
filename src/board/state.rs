//! The pipeline board: working copy, drag gestures and reconciliation.

use tracing::{debug, info, warn};

use super::grouping::{columns_for_view, group_by_stage, StageColumn, Totals};
use super::pending::{PendingMove, PendingMoves, RollbackPolicy};
use crate::models::{sort_stages, ClientType, Deal, DealUpdate, Stage};

/// Where a dragged card was released.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    /// Released over a stage column.
    Stage(String),
    /// Released over another card; the move targets that card's stage.
    Deal(String),
}

/// A persist call the caller must issue for an optimistic move.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistRequest {
    pub ticket: u64,
    pub deal_id: String,
    pub update: DealUpdate,
}

/// What a drag-end did.
#[derive(Debug, Clone, PartialEq)]
pub enum DropOutcome {
    /// No drop target; the gesture was abandoned.
    Cancelled,
    /// The dragged deal or the target could not be resolved.
    Unresolved,
    /// Dropped on the stage the deal is already in.
    Unchanged,
    /// Applied optimistically; the request must be persisted.
    Moved(PersistRequest),
}

/// How a persist result was folded back into the board.
#[derive(Debug, Clone, PartialEq)]
pub enum Settlement {
    /// The backend accepted the move; server-derived data should be refreshed.
    Confirmed { deal_id: String },
    /// The backend rejected the move and the working copy was rolled back.
    RolledBack { deal_id: String, notice: String },
}

/// Client-held pipeline state.
///
/// `local_deals` is the working copy optimistic moves are applied to;
/// `server_deals` is the last list the backend provided and the target of a
/// snapshot rollback. Columns and totals are derived on demand.
#[derive(Debug)]
pub struct PipelineBoard {
    stages: Vec<Stage>,
    server_deals: Vec<Deal>,
    local_deals: Vec<Deal>,
    /// Id of the deal being dragged; resolved against the working copy on read.
    active_deal: Option<String>,
    pending: PendingMoves,
    policy: RollbackPolicy,
}

impl PipelineBoard {
    pub fn new(stages: Vec<Stage>, deals: Vec<Deal>, policy: RollbackPolicy) -> Self {
        let mut board = Self {
            stages: Vec::new(),
            server_deals: Vec::new(),
            local_deals: Vec::new(),
            active_deal: None,
            pending: PendingMoves::default(),
            policy,
        };
        board.resync(stages, deals);
        board
    }

    /// Replace the working copy with a fresh server list.
    ///
    /// Never merges: optimistic edits still pending are dropped, and `deals`
    /// becomes the new rollback snapshot.
    pub fn resync(&mut self, mut stages: Vec<Stage>, deals: Vec<Deal>) {
        sort_stages(&mut stages);
        if !self.pending.as_slice().is_empty() {
            debug!(
                pending = self.pending.as_slice().len(),
                "resync discards pending optimistic moves"
            );
        }
        self.stages = stages;
        self.local_deals = deals.clone();
        self.server_deals = deals;
        self.pending.clear();
        debug!(
            stages = self.stages.len(),
            deals = self.local_deals.len(),
            "board resynced"
        );
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// The working copy.
    pub fn deals(&self) -> &[Deal] {
        &self.local_deals
    }

    /// Last list received from the backend.
    pub fn server_deals(&self) -> &[Deal] {
        &self.server_deals
    }

    /// The deal being dragged, as it currently appears in the working copy.
    pub fn active_deal(&self) -> Option<&Deal> {
        self.deal(self.active_deal.as_deref()?)
    }

    pub fn pending(&self) -> &[PendingMove] {
        self.pending.as_slice()
    }

    pub fn deal(&self, deal_id: &str) -> Option<&Deal> {
        self.local_deals.iter().find(|d| d.id == deal_id)
    }

    pub fn stage(&self, stage_id: &str) -> Option<&Stage> {
        self.stages.iter().find(|s| s.id == stage_id)
    }

    /// All columns in display order.
    pub fn columns(&self) -> Vec<StageColumn<'_>> {
        group_by_stage(&self.stages, &self.local_deals)
    }

    /// Columns belonging to one client-type view.
    pub fn columns_for(&self, view: ClientType) -> Vec<StageColumn<'_>> {
        columns_for_view(&self.stages, &self.local_deals, view)
    }

    /// Count and value over the whole working copy.
    pub fn totals(&self) -> Totals {
        Totals::of(&self.local_deals)
    }

    /// Begin dragging `deal_id`. An unknown id clears the active deal.
    pub fn drag_start(&mut self, deal_id: &str) {
        self.active_deal = self.deal(deal_id).map(|d| d.id.clone());
        if self.active_deal.is_none() {
            debug!(deal_id, "drag started on unknown deal");
        }
    }

    /// Finish a drag of `deal_id` released over `target`.
    ///
    /// On a cross-stage drop the working copy is updated before this returns
    /// and the caller receives the request to persist.
    pub fn drag_end(&mut self, deal_id: &str, target: Option<&DropTarget>) -> DropOutcome {
        self.active_deal = None;

        let Some(target) = target else {
            return DropOutcome::Cancelled;
        };

        let Some(index) = self.local_deals.iter().position(|d| d.id == deal_id) else {
            debug!(deal_id, "dropped deal not in working copy");
            return DropOutcome::Unresolved;
        };

        let Some(stage_id) = self.resolve_target(target) else {
            debug!(deal_id, ?target, "drop target did not resolve to a stage");
            return DropOutcome::Unresolved;
        };

        let deal = &mut self.local_deals[index];
        if deal.in_stage(&stage_id) {
            return DropOutcome::Unchanged;
        }

        let from_stage = deal.stage.replace(stage_id.clone());
        let update = deal.to_update(&stage_id);
        let ticket = self.pending.record(deal_id, from_stage.clone(), &stage_id);

        info!(
            deal_id,
            ticket,
            from = from_stage.as_deref().unwrap_or("-"),
            to = %stage_id,
            "optimistic stage move"
        );

        DropOutcome::Moved(PersistRequest {
            ticket,
            deal_id: deal_id.to_string(),
            update,
        })
    }

    fn resolve_target(&self, target: &DropTarget) -> Option<String> {
        let stage_id = match target {
            DropTarget::Stage(id) => id.clone(),
            DropTarget::Deal(id) => self.deal(id)?.stage.clone()?,
        };
        self.stage(&stage_id).map(|s| s.id.clone())
    }

    /// Fold a persist result for `ticket` back into the board.
    pub fn settle(&mut self, ticket: u64, deal_id: &str, result: Result<(), String>) -> Settlement {
        let settled = self.pending.take(ticket);
        if settled.is_none() {
            debug!(ticket, deal_id, "settling a move already cleared by resync");
        }

        match result {
            Ok(()) => {
                info!(deal_id, ticket, "stage move confirmed");
                Settlement::Confirmed {
                    deal_id: deal_id.to_string(),
                }
            }
            Err(error) => {
                warn!(deal_id, ticket, %error, policy = %self.policy, "stage move rejected, rolling back");
                match self.policy {
                    RollbackPolicy::Snapshot => self.rollback_all(),
                    RollbackPolicy::PerDeal => self.rollback_deal(deal_id),
                }
                let label = self
                    .deal(deal_id)
                    .map(|d| d.label().to_string())
                    .unwrap_or_else(|| deal_id.to_string());
                Settlement::RolledBack {
                    deal_id: deal_id.to_string(),
                    notice: format!("Could not move \"{label}\": {error}"),
                }
            }
        }
    }

    fn rollback_all(&mut self) {
        self.local_deals = self.server_deals.clone();
        self.pending.clear();
    }

    fn rollback_deal(&mut self, deal_id: &str) {
        // A later move of the same deal may still be in flight; keep showing it.
        let restored = match self.pending.latest_for(deal_id) {
            Some(pending) => Some(pending.to_stage.clone()),
            None => self
                .server_deals
                .iter()
                .find(|d| d.id == deal_id)
                .and_then(|d| d.stage.clone()),
        };

        if let Some(deal) = self.local_deals.iter_mut().find(|d| d.id == deal_id) {
            deal.stage = restored;
        }
    }
}
