//! Storage façade: opens the store, routes typed requests to the matching
//! processor, and exposes the convenience surface the surrounding
//! application consumes.

use crate::adapters::sqlite::SqliteStore;
use crate::domain::{AccessType, Card, CardId, ObjectKind, RequestId, UserId};
use crate::ports::TrackerStore;
use crate::protocol::{CardRequest, Operation, Request, Response, ResponseBody};
use crate::services::{EngineError, EngineResult, access, board, card, list, plan, tag, trigger};
use mockable::{Clock, DefaultClock};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// The engine façade, generic over the store and the clock.
///
/// Dispatch is synchronous: every request either completes or fails before
/// `dispatch` returns. The façade performs no locking of its own beyond
/// what the store does per call; concurrent writers to the same entity must
/// be serialized by the caller.
#[derive(Clone)]
pub struct Tracker<S, C = DefaultClock>
where
    S: TrackerStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
}

impl Tracker<SqliteStore> {
    /// Opens (or creates) the SQLite store at `path`, creating the schema
    /// and the global archived list idempotently.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Store`] when the database cannot be opened.
    pub fn open(path: &str) -> EngineResult<Self> {
        Ok(Self::with_store(
            Arc::new(SqliteStore::open(path)?),
            Arc::new(DefaultClock),
        ))
    }
}

impl<S, C> Tracker<S, C>
where
    S: TrackerStore,
    C: Clock + Send + Sync,
{
    /// Wraps an already-opened store and clock.
    #[must_use]
    pub const fn with_store(store: Arc<S>, clock: Arc<C>) -> Self {
        Self { store, clock }
    }

    /// Returns the underlying store.
    #[must_use]
    pub const fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Routes a typed request to its processor and wraps the outcome in a
    /// response envelope carrying the request's correlation id.
    pub fn dispatch(&self, request: &Request) -> Response {
        let request_id = request.request_id();
        debug!(%request_id, kind = request.kind_label(), "dispatching request");
        let result = match request {
            Request::Board(r) => board::process(self.store.as_ref(), r),
            Request::List(r) => list::process(self.store.as_ref(), r),
            Request::Card(r) => card::process(self.store.as_ref(), self.clock.as_ref(), r),
            Request::Tag(r) => tag::process(self.store.as_ref(), r),
            Request::Plan(r) => plan::process(self.store.as_ref(), self.clock.as_ref(), r),
            Request::AddAccessRight(r) => access::grant(
                self.store.as_ref(),
                r.object_kind,
                r.object_id,
                r.user_id,
                r.access,
            )
            .map(|()| ResponseBody::Ack),
            Request::RemoveAccessRight(r) => access::revoke(
                self.store.as_ref(),
                r.object_kind,
                r.object_id,
                r.user_id,
                r.access,
            )
            .map(|()| ResponseBody::Ack),
            Request::PlanTrigger(_) => {
                trigger::materialize_due_cards(self.store.as_ref(), self.clock.utc())
                    .map(|_| ResponseBody::Ack)
            }
        };
        if let Err(error) = &result {
            debug!(%request_id, %error, "request failed");
        }
        Response { request_id, result }
    }

    /// Deserializes an untyped JSON payload and dispatches it. A payload
    /// naming no known request kind fails with `InvalidRequest`; the
    /// correlation id is recovered from the payload when present.
    pub fn handle_json(&self, value: serde_json::Value) -> Response {
        let request_id = value
            .get("request_id")
            .and_then(serde_json::Value::as_str)
            .and_then(|raw| raw.parse::<Uuid>().ok())
            .map_or_else(RequestId::new, RequestId::from_uuid);
        match serde_json::from_value::<Request>(value) {
            Ok(request) => self.dispatch(&request),
            Err(error) => Response::err(request_id, EngineError::invalid(error.to_string())),
        }
    }

    /// Computes a user's effective access to an object, cascading up the
    /// container hierarchy.
    ///
    /// # Errors
    ///
    /// Returns the object's NotExist error when it is missing.
    pub fn effective_access(
        &self,
        kind: ObjectKind,
        object_id: i64,
        user_id: UserId,
    ) -> EngineResult<AccessType> {
        access::effective_access(self.store.as_ref(), kind, object_id, user_id)
    }

    /// Moves a card to the global archived list.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::CardNotFound`] when the card is missing and
    /// [`EngineError::AccessDenied`] when the requester cannot write it.
    pub fn archive_card(&self, card_id: CardId, user_id: UserId) -> EngineResult<Card> {
        let request = CardRequest::new(Operation::Write, user_id)
            .with_id(card_id)
            .with_list(self.store.archived_list_id());
        match card::process(self.store.as_ref(), self.clock.as_ref(), &request)? {
            ResponseBody::Cards(mut cards) if !cards.is_empty() => Ok(cards.remove(0)),
            _ => Err(EngineError::CardNotFound),
        }
    }

    /// Returns every readable card created by `user_id`, ordered by
    /// descending priority.
    ///
    /// # Errors
    ///
    /// Propagates the card processor's errors, including
    /// [`EngineError::CardNotFound`] when no cards exist at all.
    pub fn cards_owned_by(&self, user_id: UserId) -> EngineResult<Vec<Card>> {
        self.readable_cards(user_id, |card| card.user_id == user_id)
    }

    /// Returns every readable card assigned to `user_id`, ordered by
    /// descending priority.
    ///
    /// # Errors
    ///
    /// Propagates the card processor's errors, including
    /// [`EngineError::CardNotFound`] when no cards exist at all.
    pub fn cards_assigned_to(&self, user_id: UserId) -> EngineResult<Vec<Card>> {
        self.readable_cards(user_id, |card| card.assignee_id == Some(user_id))
    }

    fn readable_cards(
        &self,
        user_id: UserId,
        keep: impl Fn(&Card) -> bool,
    ) -> EngineResult<Vec<Card>> {
        let request = CardRequest::new(Operation::Read, user_id);
        match card::process(self.store.as_ref(), self.clock.as_ref(), &request)? {
            ResponseBody::Cards(mut cards) => {
                cards.retain(|card| keep(card));
                Ok(cards)
            }
            _ => Ok(Vec::new()),
        }
    }
}
