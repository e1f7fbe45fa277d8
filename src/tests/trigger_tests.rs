//! Unit tests for the plan trigger engine.

use super::support::{OWNER, advance, base_time, create_board, create_card, tracker};
use crate::protocol::{
    CardRequest, Operation, PlanRequest, PlanTriggerRequest, Request, ResponseBody,
};
use crate::services::trigger::materialize_due_cards;
use chrono::Duration;
use rstest::rstest;

#[rstest]
fn catch_up_creates_one_card_per_elapsed_interval() {
    let tracker = tracker();
    let board = create_board(&tracker, "Ops", OWNER);
    let card = create_card(&tracker, "Backup", board.lists[0], OWNER);

    let create = Request::Plan(
        PlanRequest::new(Operation::Write, OWNER, card.id)
            .with_interval(Duration::hours(1))
            .with_last_created(base_time() - Duration::minutes(210)),
    );
    tracker
        .dispatch(&create)
        .result
        .expect("plan write should succeed");

    // Three whole hours have elapsed out of three and a half.
    let created = materialize_due_cards(tracker.store().as_ref(), base_time())
        .expect("trigger should succeed");
    assert_eq!(created, 3);

    let read =
        Request::Card(CardRequest::new(Operation::Read, OWNER).with_name("Backup"));
    let body = tracker
        .dispatch(&read)
        .result
        .expect("card read should succeed");
    let ResponseBody::Cards(cards) = body else {
        panic!("expected cards");
    };
    assert_eq!(cards.len(), 4);

    // Clones carry the occurrence time, not the trigger time.
    let mut clone_times: Vec<_> = cards
        .iter()
        .filter(|clone| clone.id != card.id)
        .map(|clone| clone.created_at)
        .collect();
    clone_times.sort_unstable();
    let start = base_time() - Duration::minutes(210);
    assert_eq!(
        clone_times,
        [
            start,
            start + Duration::hours(1),
            start + Duration::hours(2)
        ]
    );
}

#[rstest]
fn caught_up_plan_lags_now_by_less_than_one_interval() {
    let tracker = tracker();
    let board = create_board(&tracker, "Ops", OWNER);
    let card = create_card(&tracker, "Backup", board.lists[0], OWNER);

    let create = Request::Plan(
        PlanRequest::new(Operation::Write, OWNER, card.id)
            .with_interval(Duration::hours(1))
            .with_last_created(base_time() - Duration::minutes(210)),
    );
    tracker
        .dispatch(&create)
        .result
        .expect("plan write should succeed");
    materialize_due_cards(tracker.store().as_ref(), base_time())
        .expect("trigger should succeed");

    let read = Request::Plan(PlanRequest::new(Operation::Read, OWNER, card.id));
    let body = tracker
        .dispatch(&read)
        .result
        .expect("plan read should succeed");
    let ResponseBody::Plan(plan) = body else {
        panic!("expected a plan");
    };
    let lag = base_time() - plan.last_created_at;
    assert!(lag < Duration::hours(1));
    assert!(lag >= Duration::zero());
}

#[rstest]
fn a_second_trigger_creates_nothing_new() {
    let tracker = tracker();
    let board = create_board(&tracker, "Ops", OWNER);
    let card = create_card(&tracker, "Backup", board.lists[0], OWNER);

    let create = Request::Plan(
        PlanRequest::new(Operation::Write, OWNER, card.id)
            .with_interval(Duration::hours(1))
            .with_last_created(base_time() - Duration::minutes(210)),
    );
    tracker
        .dispatch(&create)
        .result
        .expect("plan write should succeed");

    materialize_due_cards(tracker.store().as_ref(), base_time())
        .expect("first trigger should succeed");
    let second = materialize_due_cards(tracker.store().as_ref(), base_time())
        .expect("second trigger should succeed");
    assert_eq!(second, 0);
}

#[rstest]
fn a_plan_within_its_interval_is_left_alone() {
    let tracker = tracker();
    let board = create_board(&tracker, "Ops", OWNER);
    let card = create_card(&tracker, "Backup", board.lists[0], OWNER);

    let create = Request::Plan(
        PlanRequest::new(Operation::Write, OWNER, card.id)
            .with_interval(Duration::hours(1))
            .with_last_created(base_time() - Duration::minutes(30)),
    );
    tracker
        .dispatch(&create)
        .result
        .expect("plan write should succeed");

    let created = materialize_due_cards(tracker.store().as_ref(), base_time())
        .expect("trigger should succeed");
    assert_eq!(created, 0);
}

#[rstest]
fn the_trigger_request_runs_the_engine() {
    let tracker = tracker();
    let board = create_board(&tracker, "Ops", OWNER);
    let card = create_card(&tracker, "Backup", board.lists[0], OWNER);

    let create = Request::Plan(
        PlanRequest::new(Operation::Write, OWNER, card.id)
            .with_interval(Duration::hours(1))
            .with_last_created(base_time() - Duration::hours(2)),
    );
    tracker
        .dispatch(&create)
        .result
        .expect("plan write should succeed");

    // Dispatch through a tracker pinned to the same instant.
    let trigger = Request::PlanTrigger(PlanTriggerRequest::new());
    let body = advance(&tracker, base_time())
        .dispatch(&trigger)
        .result
        .expect("trigger should succeed");
    assert_eq!(body, ResponseBody::Ack);

    let read = Request::Card(CardRequest::new(Operation::Read, OWNER).with_name("Backup"));
    let cards = tracker
        .dispatch(&read)
        .result
        .expect("card read should succeed");
    let ResponseBody::Cards(cards) = cards else {
        panic!("expected cards");
    };
    assert_eq!(cards.len(), 2);
}
