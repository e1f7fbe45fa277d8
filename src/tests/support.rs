//! Shared fixtures and helpers for the engine tests.

use crate::adapters::memory::InMemoryStore;
use crate::domain::{Board, Card, CardsList, ListId, Plan, Tag, UserId};
use crate::facade::Tracker;
use crate::protocol::{
    BoardRequest, CardRequest, ListRequest, Operation, Request, ResponseBody, TagRequest,
};
use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use std::sync::Arc;

/// The user who creates fixtures.
pub(crate) const OWNER: UserId = UserId::from_raw(1);
/// A second user with no explicit rights.
pub(crate) const OTHER: UserId = UserId::from_raw(2);

/// Clock pinned to a single instant.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FixedClock(pub(crate) DateTime<Utc>);

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

pub(crate) type TestTracker = Tracker<InMemoryStore, FixedClock>;

pub(crate) fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(crate) fn tracker() -> TestTracker {
    tracker_at(base_time())
}

pub(crate) fn tracker_at(now: DateTime<Utc>) -> TestTracker {
    Tracker::with_store(Arc::new(InMemoryStore::new()), Arc::new(FixedClock(now)))
}

/// Reuses a tracker's store under a clock pinned to a different instant.
pub(crate) fn advance(tracker: &TestTracker, now: DateTime<Utc>) -> TestTracker {
    Tracker::with_store(Arc::clone(tracker.store()), Arc::new(FixedClock(now)))
}

pub(crate) fn expect_boards(body: ResponseBody) -> Vec<Board> {
    match body {
        ResponseBody::Boards(boards) => boards,
        other => panic!("expected boards, got {other:?}"),
    }
}

pub(crate) fn expect_lists(body: ResponseBody) -> Vec<CardsList> {
    match body {
        ResponseBody::Lists(lists) => lists,
        other => panic!("expected lists, got {other:?}"),
    }
}

pub(crate) fn expect_cards(body: ResponseBody) -> Vec<Card> {
    match body {
        ResponseBody::Cards(cards) => cards,
        other => panic!("expected cards, got {other:?}"),
    }
}

pub(crate) fn expect_tags(body: ResponseBody) -> Vec<Tag> {
    match body {
        ResponseBody::Tags(tags) => tags,
        other => panic!("expected tags, got {other:?}"),
    }
}

pub(crate) fn expect_plan(body: ResponseBody) -> Plan {
    match body {
        ResponseBody::Plan(plan) => plan,
        other => panic!("expected a plan, got {other:?}"),
    }
}

pub(crate) fn create_board(tracker: &TestTracker, name: &str, owner: UserId) -> Board {
    let request = Request::Board(BoardRequest::new(Operation::Write, owner).with_name(name));
    let body = tracker
        .dispatch(&request)
        .result
        .expect("board write should succeed");
    expect_boards(body).remove(0)
}

pub(crate) fn create_card(
    tracker: &TestTracker,
    name: &str,
    list_id: ListId,
    owner: UserId,
) -> Card {
    let request = Request::Card(
        CardRequest::new(Operation::Write, owner)
            .with_name(name)
            .with_list(list_id),
    );
    let body = tracker
        .dispatch(&request)
        .result
        .expect("card write should succeed");
    expect_cards(body).remove(0)
}

pub(crate) fn create_tag(tracker: &TestTracker, name: &str) -> Tag {
    let request = Request::Tag(TagRequest::new(Operation::Write).with_name(name));
    let body = tracker
        .dispatch(&request)
        .result
        .expect("tag write should succeed");
    expect_tags(body).remove(0)
}

pub(crate) fn read_lists_of_board(
    tracker: &TestTracker,
    board: &Board,
    user: UserId,
) -> Vec<CardsList> {
    let request = Request::List(ListRequest::new(Operation::Read, user).with_board(board.id));
    let body = tracker
        .dispatch(&request)
        .result
        .expect("list read should succeed");
    expect_lists(body)
}
