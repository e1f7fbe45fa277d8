//! Unit tests for the request envelope and untyped JSON dispatch.

use super::support::{OWNER, create_board, tracker};
use crate::domain::RequestId;
use crate::protocol::{Operation, PlanRequest, Request, ResponseBody, TagRequest};
use crate::services::EngineError;
use rstest::rstest;
use serde_json::json;
use uuid::Uuid;

#[rstest]
fn json_board_write_round_trips_through_dispatch() {
    let tracker = tracker();
    let response = tracker.handle_json(json!({
        "kind": "board",
        "op": "write",
        "user_id": 1,
        "name": "Ops",
    }));
    let body = response.result.expect("board write should succeed");
    let ResponseBody::Boards(boards) = body else {
        panic!("expected boards");
    };
    assert_eq!(boards[0].name, "Ops");
}

#[rstest]
fn unknown_kind_is_an_invalid_request() {
    let tracker = tracker();
    let response = tracker.handle_json(json!({
        "kind": "sticky_note",
        "op": "write",
        "user_id": 1,
    }));
    assert!(matches!(
        response.result,
        Err(EngineError::InvalidRequest(_))
    ));
}

#[rstest]
fn correlation_id_is_recovered_from_a_rejected_payload() {
    let tracker = tracker();
    let raw = Uuid::new_v4();
    let response = tracker.handle_json(json!({
        "kind": "sticky_note",
        "request_id": raw.to_string(),
    }));
    assert_eq!(response.request_id, RequestId::from_uuid(raw));
    assert!(response.result.is_err());
}

#[rstest]
fn missing_operation_surfaces_through_json_dispatch() {
    let tracker = tracker();
    create_board(&tracker, "Ops", OWNER);
    let response = tracker.handle_json(json!({
        "kind": "board",
        "user_id": 1,
        "name": "Ops",
    }));
    assert!(matches!(
        response.result,
        Err(EngineError::OperationNotSpecified)
    ));
}

#[rstest]
fn responses_echo_the_request_correlation_id() {
    let tracker = tracker();
    let request = Request::Tag(TagRequest::new(Operation::Read).with_name("nope"));
    let response = tracker.dispatch(&request);
    assert_eq!(response.request_id, request.request_id());
}

#[rstest]
fn typed_requests_survive_a_serde_round_trip() {
    let request = Request::Plan(
        PlanRequest::new(Operation::Write, OWNER, crate::domain::CardId::from_raw(7))
            .with_interval(chrono::Duration::hours(2)),
    );
    let value = serde_json::to_value(&request).expect("request should serialize");
    assert_eq!(value["kind"], "plan");
    assert_eq!(value["op"], "write");
    assert_eq!(value["interval"], 7200);

    let parsed: Request = serde_json::from_value(value).expect("request should deserialize");
    assert_eq!(parsed, request);
}
