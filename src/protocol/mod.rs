//! Request/response contract of the engine.
//!
//! One typed request per entity kind, a closed [`Request`] enum for routing,
//! and a [`Response`] envelope that echoes the correlation id and carries
//! the outcome as a `(result, error)` pair.

mod request;
mod response;

pub use request::{
    AccessRightRequest, BoardRequest, CardRequest, ListRequest, Operation, PlanRequest,
    PlanTriggerRequest, Request, TagRequest,
};
pub use response::{Response, ResponseBody};
