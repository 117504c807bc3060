//! Drag, persist and reconcile through a backend

use std::time::Duration;

use deal_board::board::{BoardSession, DropOutcome, DropTarget, NoticeLevel, RollbackPolicy};

use super::helpers::*;

fn load(backend: &std::sync::Arc<FakeBackend>, policy: RollbackPolicy) -> BoardSession {
    BoardSession::load(backend.clone(), OWNER, policy)
}

fn drag(session: &mut BoardSession, deal_id: &str, stage_id: &str) -> DropOutcome {
    session.drag_start(deal_id);
    session.drag_end(deal_id, Some(&DropTarget::Stage(stage_id.to_string())))
}

fn notice_message(session: &mut BoardSession) -> Option<String> {
    session.notice().map(|n| n.message.clone())
}

#[test]
fn test_initial_load_sorts_stages_and_groups_deals() {
    let backend = FakeBackend::new(buyer_stages(), sample_deals());
    let session = load(&backend, RollbackPolicy::Snapshot);

    let ids: Vec<&str> = session
        .board()
        .stages()
        .iter()
        .map(|s| s.id.as_str())
        .collect();
    assert_eq!(ids, vec!["new", "contract", "closed"]);

    let columns = session.board().columns();
    assert_eq!(columns[0].deals.len(), 2);
    assert_eq!(columns[1].deals.len(), 1);
    assert!(columns[2].deals.is_empty());
}

#[test]
fn test_accepted_move_is_persisted_then_refreshed() {
    let backend = FakeBackend::new(buyer_stages(), sample_deals());
    let mut session = load(&backend, RollbackPolicy::Snapshot);
    assert_eq!(backend.list_calls(), 1);

    let outcome = drag(&mut session, "d1", "contract");
    assert!(matches!(outcome, DropOutcome::Moved(_)));
    assert_eq!(stage_of(session.board().deals(), "d1"), Some("contract"));

    assert!(session.wait_idle(WAIT));

    let updates = backend.updates();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].0, "d1");
    assert_eq!(updates[0].1.stage, "contract");

    // Success triggers a refresh whose result becomes the new snapshot.
    assert_eq!(backend.list_calls(), 2);
    assert_eq!(stage_of(session.board().server_deals(), "d1"), Some("contract"));
    assert_eq!(stage_of(session.board().deals(), "d1"), Some("contract"));
    assert!(session.board().pending().is_empty());
    assert!(notice_message(&mut session).is_none());
}

#[test]
fn test_persist_sends_full_record_with_defaults() {
    let backend = FakeBackend::new(buyer_stages(), sample_deals());
    let mut session = load(&backend, RollbackPolicy::Snapshot);

    drag(&mut session, "d1", "contract");
    assert!(session.wait_idle(WAIT));

    let (_, update) = &backend.updates()[0];
    assert_eq!(update.title, "12 Oak St");
    assert_eq!(update.price, Some(450_000.0));
    assert_eq!(update.contact, None);
    assert_eq!(update.closing_date, "");
    assert_eq!(update.inspection_date, "");
    assert_eq!(update.appraisal_date, "");
    assert_eq!(update.commission, 0.0);
    assert_eq!(update.commission_split, 0.0);
    assert_eq!(update.property_address, "");
    assert_eq!(update.description, "");
}

#[test]
fn test_rejected_move_rolls_back_and_raises_notice() {
    let backend = FakeBackend::new(buyer_stages(), sample_deals());
    backend.reject_updates(Some(500));
    let mut session = load(&backend, RollbackPolicy::Snapshot);

    drag(&mut session, "d1", "contract");
    assert_eq!(stage_of(session.board().deals(), "d1"), Some("contract"));

    assert!(session.wait_idle(WAIT));

    assert_eq!(stage_of(session.board().deals(), "d1"), Some("new"));
    assert_eq!(session.board().deals(), session.board().server_deals());
    // No refresh after a rejection.
    assert_eq!(backend.list_calls(), 1);

    let notice = session.notice().cloned().expect("rejection should raise a notice");
    assert_eq!(notice.level, NoticeLevel::Error);
    assert!(notice.message.contains("Could not move \"12 Oak St\""));
    assert!(notice.message.contains("HTTP 500"));
}

#[test]
fn test_optimistic_move_is_visible_while_persist_is_in_flight() {
    let backend = FakeBackend::new(buyer_stages(), sample_deals());
    backend.pause_updates();
    let mut session = load(&backend, RollbackPolicy::Snapshot);

    drag(&mut session, "d1", "closed");
    assert_eq!(session.in_flight(), 1);
    assert!(!session.wait_idle(Duration::from_millis(50)));

    assert_eq!(session.pump(), 0);
    assert_eq!(stage_of(session.board().deals(), "d1"), Some("closed"));
    assert_eq!(stage_of(session.board().server_deals(), "d1"), Some("new"));
    assert_eq!(session.board().pending().len(), 1);

    backend.resume_updates();
    assert!(session.wait_idle(WAIT));
    assert_eq!(session.in_flight(), 0);
    assert_eq!(stage_of(session.board().server_deals(), "d1"), Some("closed"));
}

#[test]
fn test_snapshot_rollback_discards_every_concurrent_move() {
    let backend = FakeBackend::new(buyer_stages(), sample_deals());
    backend.pause_updates();
    backend.reject_updates(Some(409));
    let mut session = load(&backend, RollbackPolicy::Snapshot);

    drag(&mut session, "d1", "contract");
    drag(&mut session, "d2", "closed");
    assert_eq!(session.in_flight(), 2);

    backend.resume_updates();
    assert!(session.wait_idle(WAIT));

    assert_eq!(stage_of(session.board().deals(), "d1"), Some("new"));
    assert_eq!(stage_of(session.board().deals(), "d2"), Some("new"));
    assert!(session.board().pending().is_empty());
    assert_eq!(backend.updates().len(), 2);
}

#[test]
fn test_per_deal_rollback_restores_only_the_rejected_deal() {
    let backend = FakeBackend::new(buyer_stages(), sample_deals());
    backend.reject_updates(Some(422));
    let mut session = load(&backend, RollbackPolicy::PerDeal);

    drag(&mut session, "d1", "contract");
    assert!(session.wait_idle(WAIT));

    assert_eq!(stage_of(session.board().deals(), "d1"), Some("new"));
    assert_eq!(stage_of(session.board().deals(), "d3"), Some("contract"));
    assert!(notice_message(&mut session).is_some());
}

#[test]
fn test_drop_on_own_stage_dispatches_nothing() {
    let backend = FakeBackend::new(buyer_stages(), sample_deals());
    let mut session = load(&backend, RollbackPolicy::Snapshot);

    let outcome = drag(&mut session, "d1", "new");

    assert_eq!(outcome, DropOutcome::Unchanged);
    assert_eq!(session.in_flight(), 0);
    assert!(session.wait_idle(Duration::from_millis(10)));
    assert!(backend.updates().is_empty());
}

#[test]
fn test_drop_on_a_card_moves_to_that_cards_stage() {
    let backend = FakeBackend::new(buyer_stages(), sample_deals());
    let mut session = load(&backend, RollbackPolicy::Snapshot);

    session.drag_start("d2");
    let outcome = session.drag_end("d2", Some(&DropTarget::Deal("d3".to_string())));
    assert!(matches!(outcome, DropOutcome::Moved(_)));

    assert!(session.wait_idle(WAIT));
    assert_eq!(backend.updates()[0].1.stage, "contract");
    assert_eq!(stage_of(session.board().deals(), "d2"), Some("contract"));
}

#[test]
fn test_refresh_picks_up_changes_made_elsewhere() {
    let backend = FakeBackend::new(buyer_stages(), sample_deals());
    let mut session = load(&backend, RollbackPolicy::Snapshot);

    backend.set_stage("d3", "closed");
    session.refresh();
    assert!(session.wait_idle(WAIT));

    assert_eq!(stage_of(session.board().deals(), "d3"), Some("closed"));
    assert_eq!(session.board().totals().count, 3);
}

#[test]
fn test_failed_refresh_keeps_board_and_raises_notice() {
    let backend = FakeBackend::new(buyer_stages(), sample_deals());
    let mut session = load(&backend, RollbackPolicy::Snapshot);

    backend.fail_lists(Some(503));
    session.refresh();
    assert!(session.wait_idle(WAIT));

    assert_eq!(session.board().deals().len(), 3);
    let message = notice_message(&mut session).unwrap();
    assert!(message.starts_with("Refresh failed"));
    assert!(message.contains("HTTP 503"));
}

#[test]
fn test_failed_initial_load_starts_empty_with_notice() {
    let backend = FakeBackend::new(buyer_stages(), sample_deals());
    backend.fail_lists(Some(401));
    let mut session = load(&backend, RollbackPolicy::Snapshot);

    assert!(session.board().stages().is_empty());
    assert!(session.board().deals().is_empty());
    assert!(notice_message(&mut session)
        .unwrap()
        .starts_with("Could not load pipeline"));

    backend.fail_lists(None);
    session.refresh();
    assert!(session.wait_idle(WAIT));
    assert_eq!(session.board().stages().len(), 3);
    assert_eq!(session.board().deals().len(), 3);
}
