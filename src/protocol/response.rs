//! Typed responses, echoing the correlation id of the request they answer.

use crate::domain::{Board, Card, CardsList, Plan, RequestId, Tag};
use crate::services::EngineError;
use serde::Serialize;

/// Successful response payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResponseBody {
    /// Boards matching a board read or write.
    Boards(Vec<Board>),
    /// Lists matching a list read or write.
    Lists(Vec<CardsList>),
    /// Cards matching a card read or write, ordered by descending priority.
    Cards(Vec<Card>),
    /// Tags matching a tag read or write.
    Tags(Vec<Tag>),
    /// The plan produced by a plan read or write.
    Plan(Plan),
    /// Acknowledgement of an operation with no payload (deletes, access
    /// changes, trigger runs).
    Ack,
}

/// Response envelope: the request's correlation id plus its outcome as a
/// `(result, error)` pair.
#[derive(Debug)]
pub struct Response {
    /// Correlation id of the request this answers.
    pub request_id: RequestId,
    /// The outcome: a payload, or the first error encountered.
    pub result: Result<ResponseBody, EngineError>,
}

impl Response {
    /// Builds a successful response.
    #[must_use]
    pub const fn ok(request_id: RequestId, body: ResponseBody) -> Self {
        Self {
            request_id,
            result: Ok(body),
        }
    }

    /// Builds a failed response.
    #[must_use]
    pub const fn err(request_id: RequestId, error: EngineError) -> Self {
        Self {
            request_id,
            result: Err(error),
        }
    }
}
