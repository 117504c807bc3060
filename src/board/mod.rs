//! Deal pipeline board with optimistic stage moves.
//!
//! A drag that crosses stages is applied to the working copy immediately and
//! persisted in the background. Success triggers a refresh whose result
//! replaces the working copy; failure rolls the working copy back according
//! to the configured [`RollbackPolicy`].

pub mod dispatch;
pub mod grouping;
pub mod pending;
pub mod session;
pub mod state;


pub use dispatch::{fetch_snapshot, Completion, Dispatcher, Snapshot};
pub use grouping::{group_by_stage, StageColumn, Totals};
pub use pending::{PendingMove, RollbackPolicy};
pub use session::{BoardSession, Notice, NoticeLevel};
pub use state::{DropOutcome, DropTarget, PersistRequest, PipelineBoard, Settlement};
