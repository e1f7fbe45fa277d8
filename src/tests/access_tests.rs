//! Unit tests for the permission bitset and cascading access validation.

use super::support::{OTHER, OWNER, create_board, create_card, tracker};
use crate::domain::{AccessType, ObjectKind};
use crate::protocol::{AccessRightRequest, BoardRequest, Operation, Request};
use crate::services::EngineError;
use rstest::rstest;

#[rstest]
#[case(AccessType::NONE, "none")]
#[case(AccessType::READ, "read")]
#[case(AccessType::WRITE, "write")]
#[case(AccessType::READ_WRITE, "read_write")]
fn bitset_textual_form(#[case] access: AccessType, #[case] expected: &str) {
    assert_eq!(access.as_str(), expected);
}

#[rstest]
fn revoking_unset_bits_is_a_no_op() {
    let current = AccessType::READ;
    assert_eq!(current.revoke(AccessType::WRITE), AccessType::READ);
}

#[rstest]
fn grant_then_revoke_round_trips() {
    let full = AccessType::NONE.grant(AccessType::READ_WRITE);
    assert_eq!(full, AccessType::READ_WRITE);
    assert_eq!(full.revoke(AccessType::WRITE), AccessType::READ);
}

#[rstest]
fn unknown_bits_are_discarded_on_load() {
    assert_eq!(AccessType::from_bits(0b1110), AccessType::WRITE);
}

#[rstest]
fn absent_row_means_full_access() {
    let tracker = tracker();
    let board = create_board(&tracker, "Ops", OWNER);

    let access = tracker
        .effective_access(ObjectKind::Board, board.id.value(), OTHER)
        .expect("board exists");
    assert_eq!(access, AccessType::READ_WRITE);
}

#[rstest]
fn explicit_row_narrows_to_exactly_its_bits() {
    let tracker = tracker();
    let board = create_board(&tracker, "Ops", OWNER);

    let grant = Request::AddAccessRight(AccessRightRequest::new(
        ObjectKind::Board,
        board.id.value(),
        OTHER,
        AccessType::READ,
    ));
    tracker.dispatch(&grant).result.expect("grant should succeed");

    let access = tracker
        .effective_access(ObjectKind::Board, board.id.value(), OTHER)
        .expect("board exists");
    assert_eq!(access, AccessType::READ);
}

#[rstest]
fn revoked_write_blocks_board_rename() {
    let tracker = tracker();
    let board = create_board(&tracker, "Ops", OWNER);

    let grant = Request::AddAccessRight(AccessRightRequest::new(
        ObjectKind::Board,
        board.id.value(),
        OTHER,
        AccessType::READ_WRITE,
    ));
    tracker.dispatch(&grant).result.expect("grant should succeed");
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

    let rename = Request::Board(
        BoardRequest::new(Operation::Write, OTHER)
            .with_id(board.id)
            .with_name("Renamed"),
    );
    let result = tracker.dispatch(&rename).result;
    assert!(matches!(result, Err(EngineError::AccessDenied)));
}

#[rstest]
fn revoking_from_an_absent_row_bans_the_pair() {
    let tracker = tracker();
    let board = create_board(&tracker, "Ops", OWNER);

    let revoke = Request::RemoveAccessRight(AccessRightRequest::new(
        ObjectKind::Board,
        board.id.value(),
        OTHER,
        AccessType::READ_WRITE,
    ));
    tracker
        .dispatch(&revoke)
        .result
        .expect("revoke should succeed");

    let access = tracker
        .effective_access(ObjectKind::Board, board.id.value(), OTHER)
        .expect("board exists");
    assert!(access.is_none());
}

#[rstest]
fn card_access_is_the_and_of_its_ancestors() {
    let tracker = tracker();
    let board = create_board(&tracker, "Ops", OWNER);
    let card = create_card(&tracker, "Deploy", board.lists[0], OWNER);

    // Narrow the board to READ for the second user; the card and list carry
    // no explicit rows of their own.
    let grant = Request::AddAccessRight(AccessRightRequest::new(
        ObjectKind::Board,
        board.id.value(),
        OTHER,
        AccessType::READ,
    ));
    tracker.dispatch(&grant).result.expect("grant should succeed");

    let access = tracker
        .effective_access(ObjectKind::Card, card.id.value(), OTHER)
        .expect("card exists");
    assert_eq!(access, AccessType::READ);
}

#[rstest]
fn effective_access_reports_missing_objects() {
    let tracker = tracker();
    let result = tracker.effective_access(ObjectKind::Card, 999, OWNER);
    assert!(matches!(result, Err(EngineError::CardNotFound)));
}
