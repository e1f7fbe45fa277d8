//! Unit tests for the plan processor.

use super::support::{
    OTHER, OWNER, base_time, create_board, create_card, expect_plan, tracker,
};
use crate::domain::{AccessType, DomainError, MIN_PLAN_INTERVAL_SECONDS, ObjectKind};
use crate::protocol::{AccessRightRequest, Operation, PlanRequest, Request};
use crate::services::EngineError;
use chrono::Duration;
use rstest::rstest;

#[rstest]
fn creating_a_plan_requires_an_interval() {
    let tracker = tracker();
    let board = create_board(&tracker, "Ops", OWNER);
    let card = create_card(&tracker, "Backup", board.lists[0], OWNER);

    let request = Request::Plan(PlanRequest::new(Operation::Write, OWNER, card.id));
    let result = tracker.dispatch(&request).result;
    assert!(matches!(result, Err(EngineError::InvalidRequest(_))));
}

#[rstest]
fn intervals_below_the_floor_are_rejected() {
    let tracker = tracker();
    let board = create_board(&tracker, "Ops", OWNER);
    let card = create_card(&tracker, "Backup", board.lists[0], OWNER);

    let request = Request::Plan(
        PlanRequest::new(Operation::Write, OWNER, card.id)
            .with_interval(Duration::seconds(MIN_PLAN_INTERVAL_SECONDS - 1)),
    );
    let result = tracker.dispatch(&request).result;
    assert!(matches!(
        result,
        Err(EngineError::Domain(DomainError::IntervalTooShort { .. }))
    ));
}

#[rstest]
fn created_plan_defaults_last_created_to_now() {
    let tracker = tracker();
    let board = create_board(&tracker, "Ops", OWNER);
    let card = create_card(&tracker, "Backup", board.lists[0], OWNER);

    let request = Request::Plan(
        PlanRequest::new(Operation::Write, OWNER, card.id).with_interval(Duration::hours(1)),
    );
    let body = tracker
        .dispatch(&request)
        .result
        .expect("plan write should succeed");
    let plan = expect_plan(body);
    assert_eq!(plan.card_id, card.id);
    assert_eq!(plan.interval, Duration::hours(1));
    assert_eq!(plan.last_created_at, base_time());
}

#[rstest]
fn write_upserts_the_single_plan_of_a_card() {
    let tracker = tracker();
    let board = create_board(&tracker, "Ops", OWNER);
    let card = create_card(&tracker, "Backup", board.lists[0], OWNER);

    let create = Request::Plan(
        PlanRequest::new(Operation::Write, OWNER, card.id).with_interval(Duration::hours(1)),
    );
    let first = expect_plan(
        tracker
            .dispatch(&create)
            .result
            .expect("create should succeed"),
    );

    let update = Request::Plan(
        PlanRequest::new(Operation::Write, OWNER, card.id).with_interval(Duration::hours(6)),
    );
    let second = expect_plan(
        tracker
            .dispatch(&update)
            .result
            .expect("update should succeed"),
    );

    assert_eq!(second.id, first.id);
    assert_eq!(second.interval, Duration::hours(6));
    assert_eq!(second.last_created_at, first.last_created_at);
}

#[rstest]
fn plan_operations_target_a_known_card() {
    let tracker = tracker();
    let request = Request::Plan(PlanRequest::new(
        Operation::Read,
        OWNER,
        crate::domain::CardId::from_raw(999),
    ));
    let result = tracker.dispatch(&request).result;
    assert!(matches!(result, Err(EngineError::CardNotFound)));
}

#[rstest]
fn reading_a_card_without_a_plan_reports_not_found() {
    let tracker = tracker();
    let board = create_board(&tracker, "Ops", OWNER);
    let card = create_card(&tracker, "Backup", board.lists[0], OWNER);

    let request = Request::Plan(PlanRequest::new(Operation::Read, OWNER, card.id));
    let result = tracker.dispatch(&request).result;
    assert!(matches!(result, Err(EngineError::PlanNotFound)));
}

#[rstest]
fn plan_writes_require_write_access_to_the_card() {
    let tracker = tracker();
    let board = create_board(&tracker, "Ops", OWNER);
    let card = create_card(&tracker, "Backup", board.lists[0], OWNER);

    let revoke = Request::RemoveAccessRight(AccessRightRequest::new(
        ObjectKind::Card,
        card.id.value(),
        OTHER,
        AccessType::WRITE,
    ));
    tracker
        .dispatch(&revoke)
        .result
        .expect("revoke should succeed");

    let request = Request::Plan(
        PlanRequest::new(Operation::Write, OTHER, card.id).with_interval(Duration::hours(1)),
    );
    let result = tracker.dispatch(&request).result;
    assert!(matches!(result, Err(EngineError::AccessDenied)));
}

#[rstest]
fn delete_removes_the_plan() {
    let tracker = tracker();
    let board = create_board(&tracker, "Ops", OWNER);
    let card = create_card(&tracker, "Backup", board.lists[0], OWNER);

    let create = Request::Plan(
        PlanRequest::new(Operation::Write, OWNER, card.id).with_interval(Duration::hours(1)),
    );
    tracker
        .dispatch(&create)
        .result
        .expect("create should succeed");

    let delete = Request::Plan(PlanRequest::new(Operation::Delete, OWNER, card.id));
    tracker
        .dispatch(&delete)
        .result
        .expect("delete should succeed");

    let read = Request::Plan(PlanRequest::new(Operation::Read, OWNER, card.id));
    let result = tracker.dispatch(&read).result;
    assert!(matches!(result, Err(EngineError::PlanNotFound)));
}
