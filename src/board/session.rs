//! Glue between the board and its background calls.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use super::dispatch::{fetch_snapshot, Completion, Dispatcher, Snapshot};
use super::pending::RollbackPolicy;
use super::state::{DropOutcome, DropTarget, PipelineBoard, Settlement};
use crate::api::Backend;

/// How long a notice stays visible.
pub const NOTICE_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// Transient user-facing message.
#[derive(Debug, Clone)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub raised_at: Instant,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
            raised_at: Instant::now(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
            raised_at: Instant::now(),
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.raised_at) >= NOTICE_TTL
    }
}

/// A board wired to a backend.
///
/// Drag gestures go straight to the board; persist and refresh calls run on
/// the dispatcher and are folded back in by [`BoardSession::pump`].
pub struct BoardSession {
    board: PipelineBoard,
    dispatcher: Dispatcher,
    notice: Option<Notice>,
}

impl BoardSession {
    /// Fetch the initial snapshot and build the board.
    ///
    /// A failed fetch leaves the board empty with an error notice instead of
    /// failing, so the caller can still render and retry with a refresh.
    pub fn load(backend: Arc<dyn Backend>, owner: &str, policy: RollbackPolicy) -> Self {
        let (snapshot, notice) = match fetch_snapshot(backend.as_ref(), owner) {
            Ok(snapshot) => (snapshot, None),
            Err(e) => {
                warn!(error = %e, "initial load failed, starting with an empty board");
                (
                    Snapshot::default(),
                    Some(Notice::error(format!("Could not load pipeline: {e}"))),
                )
            }
        };

        info!(
            stages = snapshot.stages.len(),
            deals = snapshot.deals.len(),
            %policy,
            "board loaded"
        );

        Self {
            board: PipelineBoard::new(snapshot.stages, snapshot.deals, policy),
            dispatcher: Dispatcher::new(backend, owner),
            notice,
        }
    }

    pub fn board(&self) -> &PipelineBoard {
        &self.board
    }

    pub fn in_flight(&self) -> usize {
        self.dispatcher.in_flight()
    }

    /// Current notice, dropping it once it has expired.
    pub fn notice(&mut self) -> Option<&Notice> {
        if self
            .notice
            .as_ref()
            .is_some_and(|n| n.is_expired(Instant::now()))
        {
            self.notice = None;
        }
        self.notice.as_ref()
    }

    pub fn drag_start(&mut self, deal_id: &str) {
        self.board.drag_start(deal_id);
    }

    /// Finish a drag; a cross-stage drop is applied now and persisted in the
    /// background.
    pub fn drag_end(&mut self, deal_id: &str, target: Option<&DropTarget>) -> DropOutcome {
        let outcome = self.board.drag_end(deal_id, target);
        if let DropOutcome::Moved(request) = &outcome {
            self.dispatcher.persist(request.clone());
        }
        outcome
    }

    /// Ask for fresh server data.
    pub fn refresh(&mut self) {
        self.dispatcher.refresh();
    }

    /// Apply every completion that has arrived. Returns how many were applied.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Some(completion) = self.dispatcher.try_next() {
            self.apply(completion);
            applied += 1;
        }
        applied
    }

    /// Block until all background calls have been applied or `timeout`
    /// passes. Returns `true` when nothing is left in flight.
    pub fn wait_idle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.dispatcher.in_flight() > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return false;
            }
            match self.dispatcher.wait_next(remaining) {
                Some(completion) => self.apply(completion),
                None => return self.dispatcher.in_flight() == 0,
            }
        }
        true
    }

    fn apply(&mut self, completion: Completion) {
        match completion {
            Completion::Persisted {
                ticket,
                deal_id,
                result,
            } => {
                let result = result.map_err(|e| e.to_string());
                match self.board.settle(ticket, &deal_id, result) {
                    Settlement::Confirmed { .. } => self.dispatcher.refresh(),
                    Settlement::RolledBack { notice, .. } => {
                        self.notice = Some(Notice::error(notice));
                    }
                }
            }
            Completion::Refreshed(Ok(snapshot)) => {
                self.board.resync(snapshot.stages, snapshot.deals);
            }
            Completion::Refreshed(Err(e)) => {
                warn!(error = %e, "refresh failed, keeping current board");
                self.notice = Some(Notice::error(format!("Refresh failed: {e}")));
            }
        }
    }

    pub fn set_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }
}
