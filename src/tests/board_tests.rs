//! Unit tests for the board processor.

use super::support::{
    OTHER, OWNER, create_board, create_card, expect_boards, read_lists_of_board, tracker,
};
use crate::domain::{ARCHIVED_LIST_NAME, AccessType, DEFAULT_LIST_NAMES, ObjectKind};
use crate::ports::ListStore;
use crate::protocol::{AccessRightRequest, BoardRequest, Operation, Request, ResponseBody};
use crate::services::EngineError;
use rstest::rstest;

#[rstest]
fn creating_a_board_creates_the_default_lists() {
    let tracker = tracker();
    let board = create_board(&tracker, "Ops", OWNER);

    assert_eq!(board.name, "Ops");
    assert_eq!(board.lists.len(), 3);

    let names: Vec<String> = read_lists_of_board(&tracker, &board, OWNER)
        .into_iter()
        .map(|list| list.name)
        .collect();
    assert_eq!(names, DEFAULT_LIST_NAMES);
}

#[rstest]
fn the_archived_list_is_global_and_single() {
    let tracker = tracker();
    create_board(&tracker, "Ops", OWNER);
    create_board(&tracker, "Home", OWNER);

    let archived_id = tracker.store().archived_list_id();
    let archived = tracker
        .store()
        .find_list(archived_id)
        .expect("store should answer")
        .expect("archived list exists");
    assert_eq!(archived.name, ARCHIVED_LIST_NAME);
    assert!(archived.is_archived());

    let all = tracker.store().all_lists().expect("store should answer");
    let archived_count = all.iter().filter(|list| list.is_archived()).count();
    assert_eq!(archived_count, 1);
    assert_eq!(all.len(), 7);
}

#[rstest]
fn write_with_id_renames() {
    let tracker = tracker();
    let board = create_board(&tracker, "Ops", OWNER);

    let request = Request::Board(
        BoardRequest::new(Operation::Write, OWNER)
            .with_id(board.id)
            .with_name("Operations"),
    );
    let body = tracker
        .dispatch(&request)
        .result
        .expect("rename should succeed");
    let renamed = expect_boards(body).remove(0);
    assert_eq!(renamed.id, board.id);
    assert_eq!(renamed.name, "Operations");
}

#[rstest]
fn id_wins_over_name_on_lookup() {
    let tracker = tracker();
    let first = create_board(&tracker, "Ops", OWNER);
    create_board(&tracker, "Home", OWNER);

    let request = Request::Board(
        BoardRequest::new(Operation::Read, OWNER)
            .with_id(first.id)
            .with_name("Home"),
    );
    let body = tracker
        .dispatch(&request)
        .result
        .expect("read should succeed");
    let boards = expect_boards(body);
    assert_eq!(boards.len(), 1);
    assert_eq!(boards[0].name, "Ops");
}

#[rstest]
fn read_without_filters_returns_every_readable_board() {
    let tracker = tracker();
    create_board(&tracker, "Ops", OWNER);
    create_board(&tracker, "Home", OWNER);

    let request = Request::Board(BoardRequest::new(Operation::Read, OTHER));
    let body = tracker
        .dispatch(&request)
        .result
        .expect("read should succeed");
    assert_eq!(expect_boards(body).len(), 2);
}

#[rstest]
fn reading_an_unknown_board_reports_not_found() {
    let tracker = tracker();
    let request = Request::Board(BoardRequest::new(Operation::Read, OWNER).with_name("Nope"));
    let result = tracker.dispatch(&request).result;
    assert!(matches!(result, Err(EngineError::BoardNotFound)));
}

#[rstest]
fn missing_operation_is_rejected() {
    let tracker = tracker();
    let mut request = BoardRequest::new(Operation::Read, OWNER);
    request.op = None;
    let result = tracker.dispatch(&Request::Board(request)).result;
    assert!(matches!(result, Err(EngineError::OperationNotSpecified)));
}

#[rstest]
fn delete_cascades_to_lists_cards_and_rights() {
    let tracker = tracker();
    let board = create_board(&tracker, "Ops", OWNER);
    let card = create_card(&tracker, "Deploy", board.lists[0], OWNER);

    let request = Request::Board(BoardRequest::new(Operation::Delete, OWNER).with_id(board.id));
    let body = tracker
        .dispatch(&request)
        .result
        .expect("delete should succeed");
    assert_eq!(body, ResponseBody::Ack);

    let card_result = tracker.effective_access(ObjectKind::Card, card.id.value(), OWNER);
    assert!(matches!(card_result, Err(EngineError::CardNotFound)));
    let list_result =
        tracker.effective_access(ObjectKind::List, board.lists[0].value(), OWNER);
    assert!(matches!(list_result, Err(EngineError::ListNotFound)));
    let board_result = tracker.effective_access(ObjectKind::Board, board.id.value(), OWNER);
    assert!(matches!(board_result, Err(EngineError::BoardNotFound)));
}

#[rstest]
fn delete_requires_write_access() {
    let tracker = tracker();
    let board = create_board(&tracker, "Ops", OWNER);

    let revoke = Request::RemoveAccessRight(AccessRightRequest::new(
        ObjectKind::Board,
        board.id.value(),
        OTHER,
        AccessType::WRITE,
    ));
    tracker
        .dispatch(&revoke)
        .result
        .expect("revoke should succeed");

    let request = Request::Board(BoardRequest::new(Operation::Delete, OTHER).with_id(board.id));
    let result = tracker.dispatch(&request).result;
    assert!(matches!(result, Err(EngineError::AccessDenied)));
}
