//! Behavioural integration tests for the tracker engine over SQLite.
//!
//! These tests drive the public façade through complete workflows the way a
//! client application would, from board creation through recurring-card
//! materialization.

#![expect(
    clippy::expect_used,
    reason = "Test code uses expect for assertion clarity"
)]
#![expect(
    clippy::indexing_slicing,
    reason = "Test code uses indexing after length checks"
)]

use chrono::Duration;
use corkboard::Tracker;
use corkboard::adapters::sqlite::SqliteStore;
use corkboard::domain::{AccessType, Board, Card, ObjectKind, Priority, UserId};
use corkboard::ports::ListStore;
use corkboard::protocol::{
    AccessRightRequest, BoardRequest, CardRequest, ListRequest, Operation, PlanRequest,
    PlanTriggerRequest, Request, ResponseBody,
};
use corkboard::services::EngineError;

const ALICE: UserId = UserId::from_raw(10);
const BOB: UserId = UserId::from_raw(20);

fn open_tracker() -> Tracker<SqliteStore> {
    Tracker::open(":memory:").expect("in-memory database should open")
}

fn dispatch_ok(tracker: &Tracker<SqliteStore>, request: Request) -> ResponseBody {
    tracker
        .dispatch(&request)
        .result
        .expect("request should succeed")
}

fn make_board(tracker: &Tracker<SqliteStore>, name: &str, owner: UserId) -> Board {
    match dispatch_ok(
        tracker,
        Request::Board(BoardRequest::new(Operation::Write, owner).with_name(name)),
    ) {
        ResponseBody::Boards(mut boards) => boards.remove(0),
        other => panic!("expected boards, got {other:?}"),
    }
}

fn make_card(tracker: &Tracker<SqliteStore>, request: CardRequest) -> Card {
    match dispatch_ok(tracker, Request::Card(request)) {
        ResponseBody::Cards(mut cards) => cards.remove(0),
        other => panic!("expected cards, got {other:?}"),
    }
}

#[test]
fn full_board_lifecycle() {
    let tracker = open_tracker();
    let board = make_board(&tracker, "Release", ALICE);
    assert_eq!(board.lists.len(), 3);

    // A custom list next to the defaults.
    let body = dispatch_ok(
        &tracker,
        Request::List(
            ListRequest::new(Operation::Write, ALICE)
                .with_name("Blocked")
                .with_board(board.id),
        ),
    );
    let ResponseBody::Lists(lists) = body else {
        panic!("expected lists");
    };
    assert_eq!(lists[0].board_id, Some(board.id));

    // Cards land in the first default list, ordered by priority on read.
    let todo = board.lists[0];
    make_card(
        &tracker,
        CardRequest::new(Operation::Write, ALICE)
            .with_name("write changelog")
            .with_list(todo)
            .with_priority(Priority::Low),
    );
    make_card(
        &tracker,
        CardRequest::new(Operation::Write, ALICE)
            .with_name("fix regression")
            .with_list(todo)
            .with_priority(Priority::High)
            .with_assignee(BOB),
    );

    let body = dispatch_ok(
        &tracker,
        Request::Card(CardRequest::new(Operation::Read, BOB).with_board(board.id)),
    );
    let ResponseBody::Cards(cards) = body else {
        panic!("expected cards");
    };
    assert_eq!(cards.len(), 2);
    assert_eq!(cards[0].name, "fix regression");

    let assigned = tracker
        .cards_assigned_to(BOB)
        .expect("assigned lookup should succeed");
    assert_eq!(assigned.len(), 1);
    assert_eq!(assigned[0].name, "fix regression");

    // Deleting the board takes everything with it.
    dispatch_ok(
        &tracker,
        Request::Board(BoardRequest::new(Operation::Delete, ALICE).with_id(board.id)),
    );
    let result = tracker
        .dispatch(&Request::Card(
            CardRequest::new(Operation::Read, ALICE).with_name("fix regression"),
        ))
        .result;
    assert!(matches!(result, Err(EngineError::CardNotFound)));
}

#[test]
fn rights_cascade_from_board_to_card() {
    let tracker = open_tracker();
    let board = make_board(&tracker, "Private", ALICE);
    let card = make_card(
        &tracker,
        CardRequest::new(Operation::Write, ALICE)
            .with_name("payroll")
            .with_list(board.lists[0]),
    );

    // Bob starts unrestricted, then the board is narrowed to read-only.
    dispatch_ok(
        &tracker,
        Request::AddAccessRight(AccessRightRequest::new(
            ObjectKind::Board,
            board.id.value(),
            BOB,
            AccessType::READ,
        )),
    );

    let effective = tracker
        .effective_access(ObjectKind::Card, card.id.value(), BOB)
        .expect("card exists");
    assert_eq!(effective, AccessType::READ);

    let result = tracker
        .dispatch(&Request::Card(
            CardRequest::new(Operation::Write, BOB)
                .with_id(card.id)
                .with_name("renamed"),
        ))
        .result;
    assert!(matches!(result, Err(EngineError::AccessDenied)));

    // Revoking the remaining bit hides the card from Bob entirely.
    dispatch_ok(
        &tracker,
        Request::RemoveAccessRight(AccessRightRequest::new(
            ObjectKind::Board,
            board.id.value(),
            BOB,
            AccessType::READ,
        )),
    );
    let result = tracker
        .dispatch(&Request::Card(
            CardRequest::new(Operation::Read, BOB).with_id(card.id),
        ))
        .result;
    assert!(matches!(result, Err(EngineError::AccessDenied)));
}

#[test]
fn recurring_card_materialization() {
    let tracker = open_tracker();
    let board = make_board(&tracker, "Chores", ALICE);
    let card = make_card(
        &tracker,
        CardRequest::new(Operation::Write, ALICE)
            .with_name("rotate backups")
            .with_list(board.lists[0]),
    );

    // Backdate the plan so two occurrences are already due.
    let last = card.created_at - Duration::hours(2) - Duration::minutes(30);
    dispatch_ok(
        &tracker,
        Request::Plan(
            PlanRequest::new(Operation::Write, ALICE, card.id)
                .with_interval(Duration::hours(1))
                .with_last_created(last),
        ),
    );
    dispatch_ok(
        &tracker,
        Request::PlanTrigger(PlanTriggerRequest::new()),
    );

    let body = dispatch_ok(
        &tracker,
        Request::Card(CardRequest::new(Operation::Read, ALICE).with_name("rotate backups")),
    );
    let ResponseBody::Cards(cards) = body else {
        panic!("expected cards");
    };
    assert!(cards.len() >= 3);

    // The plan caught up to within one interval of the trigger time.
    let body = dispatch_ok(
        &tracker,
        Request::Plan(PlanRequest::new(Operation::Read, ALICE, card.id)),
    );
    let ResponseBody::Plan(plan) = body else {
        panic!("expected a plan");
    };
    assert!(plan.last_created_at > last);
}

#[test]
fn archived_list_is_shared_and_protected() {
    let tracker = open_tracker();
    let board = make_board(&tracker, "Ops", ALICE);
    let card = make_card(
        &tracker,
        CardRequest::new(Operation::Write, ALICE)
            .with_name("old incident")
            .with_list(board.lists[0]),
    );

    let archived = tracker
        .archive_card(card.id, ALICE)
        .expect("archive should succeed");
    assert_eq!(archived.list_id, tracker.store().archived_list_id());

    let result = tracker
        .dispatch(&Request::List(
            ListRequest::new(Operation::Delete, ALICE)
                .with_id(tracker.store().archived_list_id()),
        ))
        .result;
    assert!(matches!(result, Err(EngineError::AccessDenied)));

    // The archived card survives its original board's deletion.
    dispatch_ok(
        &tracker,
        Request::Board(BoardRequest::new(Operation::Delete, ALICE).with_id(board.id)),
    );
    let body = dispatch_ok(
        &tracker,
        Request::Card(CardRequest::new(Operation::Read, ALICE).with_id(card.id)),
    );
    let ResponseBody::Cards(cards) = body else {
        panic!("expected cards");
    };
    assert_eq!(cards[0].name, "old incident");
}

#[test]
fn untyped_json_requests_are_routed() {
    let tracker = open_tracker();
    let response = tracker.handle_json(serde_json::json!({
        "kind": "tag",
        "op": "write",
        "name": "follow-up",
        "color": 5,
    }));
    let ResponseBody::Tags(tags) = response.result.expect("tag write should succeed") else {
        panic!("expected tags");
    };
    assert_eq!(tags[0].name, "follow-up");
    assert_eq!(tags[0].color, Some(5));

    let response = tracker.handle_json(serde_json::json!({ "kind": "nonsense" }));
    assert!(matches!(
        response.result,
        Err(EngineError::InvalidRequest(_))
    ));
}
