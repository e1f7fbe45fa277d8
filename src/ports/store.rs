//! Storage contract for the tracker engine.
//!
//! One trait per entity concern, aggregated by [`TrackerStore`]. The contract
//! is synchronous: every call either completes or fails before returning, and
//! adapters perform no internal queuing. Operations that touch several rows
//! at once (board creation with its default lists, cascade deletes, card
//! writes with their link sets) are single methods so each adapter can make
//! them atomic.

use crate::domain::{
    AccessType, Board, BoardId, Card, CardId, CardsList, ListId, ObjectKind, Plan, PlanId,
    Priority, Tag, TagId, UserId,
};
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors returned by store implementations.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The targeted row does not exist.
    #[error("row not found")]
    NotFound,

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

/// Field values for a card about to be inserted.
#[derive(Debug, Clone)]
pub struct NewCard {
    /// Card name.
    pub name: String,
    /// Task description.
    pub description: String,
    /// The creating user.
    pub user_id: UserId,
    /// The assigned user, if any.
    pub assignee_id: Option<UserId>,
    /// Expiration timestamp, if any.
    pub expiration_date: Option<DateTime<Utc>>,
    /// Task priority.
    pub priority: Priority,
    /// The containing list.
    pub list_id: ListId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last-modification timestamp.
    pub last_modified_at: DateTime<Utc>,
}

/// Board persistence contract.
pub trait BoardStore: Send + Sync {
    /// Creates a board together with its three default lists and an explicit
    /// `READ_WRITE` access row for `owner`, atomically.
    fn insert_board(&self, name: &str, owner: UserId) -> StoreResult<Board>;

    /// Renames an existing board.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the board does not exist.
    fn rename_board(&self, id: BoardId, name: &str) -> StoreResult<Board>;

    /// Finds a board by identifier.
    fn find_board(&self, id: BoardId) -> StoreResult<Option<Board>>;

    /// Finds the first board with the given name, in id order.
    fn find_board_by_name(&self, name: &str) -> StoreResult<Option<Board>>;

    /// Returns all boards in id order.
    fn all_boards(&self) -> StoreResult<Vec<Board>>;

    /// Deletes a board and cascades over its lists, their cards, and every
    /// dependent link and access row, atomically.
    fn delete_board(&self, id: BoardId) -> StoreResult<()>;
}

/// Cards-list persistence contract.
pub trait ListStore: Send + Sync {
    /// Creates a list in `board_id` with an explicit `READ_WRITE` access row
    /// for `owner`.
    fn insert_list(&self, name: &str, board_id: BoardId, owner: UserId) -> StoreResult<CardsList>;

    /// Updates a list's name and, when `board_id` is given, moves it to that
    /// board.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the list does not exist.
    fn update_list(
        &self,
        id: ListId,
        name: Option<&str>,
        board_id: Option<BoardId>,
    ) -> StoreResult<CardsList>;

    /// Finds a list by identifier.
    fn find_list(&self, id: ListId) -> StoreResult<Option<CardsList>>;

    /// Finds the first list with the given name, in id order.
    fn find_list_by_name(&self, name: &str) -> StoreResult<Option<CardsList>>;

    /// Returns the lists owned by a board, in id order.
    fn lists_in_board(&self, board_id: BoardId) -> StoreResult<Vec<CardsList>>;

    /// Returns all lists, in id order.
    fn all_lists(&self) -> StoreResult<Vec<CardsList>>;

    /// Deletes a list and cascades over its cards, atomically. The archived
    /// list is guarded by the processor, not here.
    fn delete_list(&self, id: ListId) -> StoreResult<()>;

    /// Identifier of the global archived list, created when the store was
    /// opened.
    fn archived_list_id(&self) -> ListId;
}

/// Card persistence contract.
///
/// Child links form a graph that is not checked for cycles; the engine
/// documents this rather than enforcing acyclicity.
pub trait CardStore: Send + Sync {
    /// Inserts a card with exactly the given tag and child link sets,
    /// atomically.
    fn insert_card(&self, card: NewCard, tags: &[TagId], children: &[CardId]) -> StoreResult<Card>;

    /// Rewrites a card row and replaces its tag and child link sets to match
    /// `card.tags` and `card.children`, atomically.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the card does not exist.
    fn update_card(&self, card: &Card) -> StoreResult<Card>;

    /// Finds a card by identifier.
    fn find_card(&self, id: CardId) -> StoreResult<Option<Card>>;

    /// Returns all cards in a list, in id order.
    fn cards_in_list(&self, list_id: ListId) -> StoreResult<Vec<Card>>;

    /// Returns all cards currently linked to a tag, in id order.
    fn cards_with_tag(&self, tag_id: TagId) -> StoreResult<Vec<Card>>;

    /// Returns all cards, in id order.
    fn all_cards(&self) -> StoreResult<Vec<Card>>;

    /// Deletes a card and cascades over its tag links, parent/child links in
    /// both directions, access rows, and plan, atomically.
    fn delete_card(&self, id: CardId) -> StoreResult<()>;
}

/// Tag persistence contract.
pub trait TagStore: Send + Sync {
    /// Creates a tag.
    fn insert_tag(&self, name: &str, color: Option<i32>) -> StoreResult<Tag>;

    /// Rewrites a tag row.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the tag does not exist.
    fn update_tag(&self, tag: &Tag) -> StoreResult<Tag>;

    /// Finds a tag by identifier.
    fn find_tag(&self, id: TagId) -> StoreResult<Option<Tag>>;

    /// Finds the first tag with the given name, in id order.
    fn find_tag_by_name(&self, name: &str) -> StoreResult<Option<Tag>>;

    /// Returns all tags, in id order.
    fn all_tags(&self) -> StoreResult<Vec<Tag>>;

    /// Deletes a tag and its card links.
    fn delete_tag(&self, id: TagId) -> StoreResult<()>;
}

/// Plan persistence contract. Each card owns at most one plan.
pub trait PlanStore: Send + Sync {
    /// Creates the plan for a card.
    fn insert_plan(
        &self,
        card_id: CardId,
        interval: Duration,
        last_created_at: DateTime<Utc>,
    ) -> StoreResult<Plan>;

    /// Rewrites a plan row.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the plan does not exist.
    fn update_plan(&self, plan: &Plan) -> StoreResult<Plan>;

    /// Finds the plan owned by a card.
    fn find_plan_by_card(&self, card_id: CardId) -> StoreResult<Option<Plan>>;

    /// Returns all plans, in id order.
    fn all_plans(&self) -> StoreResult<Vec<Plan>>;

    /// Advances a plan's last-materialized timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the plan does not exist.
    fn set_plan_last_created(&self, id: PlanId, last_created_at: DateTime<Utc>)
    -> StoreResult<()>;

    /// Deletes a plan.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the plan does not exist.
    fn delete_plan(&self, id: PlanId) -> StoreResult<()>;
}

/// Access-right persistence contract.
///
/// Object identifiers are the raw rowids of the object the row guards;
/// [`ObjectKind`] disambiguates the table they belong to.
pub trait AccessStore: Send + Sync {
    /// Returns the explicit access row for an (object, user) pair, or `None`
    /// when the pair is unrestricted.
    fn access_row(
        &self,
        kind: ObjectKind,
        object_id: i64,
        user_id: UserId,
    ) -> StoreResult<Option<AccessType>>;

    /// Creates or replaces the explicit access row for an (object, user)
    /// pair.
    fn set_access(
        &self,
        kind: ObjectKind,
        object_id: i64,
        user_id: UserId,
        access: AccessType,
    ) -> StoreResult<()>;
}

/// The full storage contract consumed by the processors and the façade.
pub trait TrackerStore:
    BoardStore + ListStore + CardStore + TagStore + PlanStore + AccessStore
{
}

impl<T> TrackerStore for T where
    T: BoardStore + ListStore + CardStore + TagStore + PlanStore + AccessStore
{
}
