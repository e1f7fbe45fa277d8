//! Typed requests, one per entity kind, wrapped in a closed [`Request`] enum.
//!
//! Every request carries a correlation id echoed in its response and an
//! optional operation tag; dispatch fails with `OperationNotSpecified` when
//! the tag is missing. Lookup fields follow a documented precedence: when
//! both `id` and `name` are given, `id` wins.

use crate::domain::{
    AccessType, BoardId, CardId, ListId, ObjectKind, Priority, RequestId, TagId, UserId,
    plan::serde_opt_seconds,
};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Operation requested against an entity kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Filtered retrieval.
    Read,
    /// Insert-or-update ("upsert") by id, else by name.
    Write,
    /// Removal with cascade.
    Delete,
}

/// Request against boards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardRequest {
    /// Correlation id, echoed in the response.
    #[serde(default = "RequestId::new")]
    pub request_id: RequestId,
    /// Requested operation.
    #[serde(default)]
    pub op: Option<Operation>,
    /// The requesting user.
    pub user_id: UserId,
    /// Target board id.
    #[serde(default)]
    pub id: Option<BoardId>,
    /// Target board name; consulted only when `id` is absent.
    #[serde(default)]
    pub name: Option<String>,
}

impl BoardRequest {
    /// Creates a request with the given operation and requester.
    #[must_use]
    pub fn new(op: Operation, user_id: UserId) -> Self {
        Self {
            request_id: RequestId::new(),
            op: Some(op),
            user_id,
            id: None,
            name: None,
        }
    }

    /// Sets the target board id.
    #[must_use]
    pub const fn with_id(mut self, id: BoardId) -> Self {
        self.id = Some(id);
        self
    }

    /// Sets the target board name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Request against cards lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListRequest {
    /// Correlation id, echoed in the response.
    #[serde(default = "RequestId::new")]
    pub request_id: RequestId,
    /// Requested operation.
    #[serde(default)]
    pub op: Option<Operation>,
    /// The requesting user.
    pub user_id: UserId,
    /// Target list id.
    #[serde(default)]
    pub id: Option<ListId>,
    /// Target list name; consulted only when `id` is absent.
    #[serde(default)]
    pub name: Option<String>,
    /// Owning board: required to create, a filter on reads, a move target on
    /// updates.
    #[serde(default)]
    pub board_id: Option<BoardId>,
}

impl ListRequest {
    /// Creates a request with the given operation and requester.
    #[must_use]
    pub fn new(op: Operation, user_id: UserId) -> Self {
        Self {
            request_id: RequestId::new(),
            op: Some(op),
            user_id,
            id: None,
            name: None,
            board_id: None,
        }
    }

    /// Sets the target list id.
    #[must_use]
    pub const fn with_id(mut self, id: ListId) -> Self {
        self.id = Some(id);
        self
    }

    /// Sets the target list name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the owning board.
    #[must_use]
    pub const fn with_board(mut self, board_id: BoardId) -> Self {
        self.board_id = Some(board_id);
        self
    }
}

/// Request against cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardRequest {
    /// Correlation id, echoed in the response.
    #[serde(default = "RequestId::new")]
    pub request_id: RequestId,
    /// Requested operation.
    #[serde(default)]
    pub op: Option<Operation>,
    /// The requesting user.
    pub user_id: UserId,
    /// Target card id.
    #[serde(default)]
    pub id: Option<CardId>,
    /// Target card name; consulted only when `id` is absent.
    #[serde(default)]
    pub name: Option<String>,
    /// Task description; absent fields are left unchanged on update.
    #[serde(default)]
    pub description: Option<String>,
    /// Expiration timestamp.
    #[serde(default)]
    pub expiration_date: Option<DateTime<Utc>>,
    /// Task priority.
    #[serde(default)]
    pub priority: Option<Priority>,
    /// Assigned user.
    #[serde(default)]
    pub assignee_id: Option<UserId>,
    /// Desired child card set; when present, links are reconciled to match
    /// it, skipping children the requester cannot read.
    #[serde(default)]
    pub children: Option<Vec<CardId>>,
    /// Desired tag set; when present, links are reconciled to exactly match.
    #[serde(default)]
    pub tags: Option<Vec<TagId>>,
    /// Containing list: required to create, a move target on updates, a
    /// filter on reads.
    #[serde(default)]
    pub list_id: Option<ListId>,
    /// Read filter: only cards in lists of this board.
    #[serde(default)]
    pub board_id: Option<BoardId>,
    /// Read filter: only cards linked to this tag.
    #[serde(default)]
    pub tag_id: Option<TagId>,
}

impl CardRequest {
    /// Creates a request with the given operation and requester.
    #[must_use]
    pub fn new(op: Operation, user_id: UserId) -> Self {
        Self {
            request_id: RequestId::new(),
            op: Some(op),
            user_id,
            id: None,
            name: None,
            description: None,
            expiration_date: None,
            priority: None,
            assignee_id: None,
            children: None,
            tags: None,
            list_id: None,
            board_id: None,
            tag_id: None,
        }
    }

    /// Sets the target card id.
    #[must_use]
    pub const fn with_id(mut self, id: CardId) -> Self {
        self.id = Some(id);
        self
    }

    /// Sets the target card name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the expiration timestamp.
    #[must_use]
    pub const fn with_expiration(mut self, at: DateTime<Utc>) -> Self {
        self.expiration_date = Some(at);
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets the assignee.
    #[must_use]
    pub const fn with_assignee(mut self, assignee_id: UserId) -> Self {
        self.assignee_id = Some(assignee_id);
        self
    }

    /// Sets the desired child card set.
    #[must_use]
    pub fn with_children(mut self, children: impl IntoIterator<Item = CardId>) -> Self {
        self.children = Some(children.into_iter().collect());
        self
    }

    /// Sets the desired tag set.
    #[must_use]
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = TagId>) -> Self {
        self.tags = Some(tags.into_iter().collect());
        self
    }

    /// Sets the containing list.
    #[must_use]
    pub const fn with_list(mut self, list_id: ListId) -> Self {
        self.list_id = Some(list_id);
        self
    }

    /// Sets the board read filter.
    #[must_use]
    pub const fn with_board(mut self, board_id: BoardId) -> Self {
        self.board_id = Some(board_id);
        self
    }

    /// Sets the tag read filter.
    #[must_use]
    pub const fn with_tag_filter(mut self, tag_id: TagId) -> Self {
        self.tag_id = Some(tag_id);
        self
    }
}

/// Request against tags. Tags are global and carry no requester.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRequest {
    /// Correlation id, echoed in the response.
    #[serde(default = "RequestId::new")]
    pub request_id: RequestId,
    /// Requested operation.
    #[serde(default)]
    pub op: Option<Operation>,
    /// Target tag id.
    #[serde(default)]
    pub id: Option<TagId>,
    /// Target tag name; consulted only when `id` is absent.
    #[serde(default)]
    pub name: Option<String>,
    /// Display color.
    #[serde(default)]
    pub color: Option<i32>,
}

impl TagRequest {
    /// Creates a request with the given operation.
    #[must_use]
    pub fn new(op: Operation) -> Self {
        Self {
            request_id: RequestId::new(),
            op: Some(op),
            id: None,
            name: None,
            color: None,
        }
    }

    /// Sets the target tag id.
    #[must_use]
    pub const fn with_id(mut self, id: TagId) -> Self {
        self.id = Some(id);
        self
    }

    /// Sets the target tag name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the display color.
    #[must_use]
    pub const fn with_color(mut self, color: i32) -> Self {
        self.color = Some(color);
        self
    }
}

/// Request against the plan of one card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanRequest {
    /// Correlation id, echoed in the response.
    #[serde(default = "RequestId::new")]
    pub request_id: RequestId,
    /// Requested operation.
    #[serde(default)]
    pub op: Option<Operation>,
    /// The requesting user.
    pub user_id: UserId,
    /// The card whose plan is targeted.
    pub card_id: CardId,
    /// Recurrence interval; required to create, optional on update.
    #[serde(default, with = "serde_opt_seconds")]
    pub interval: Option<Duration>,
    /// Timestamp of the most recent materialized occurrence; defaults to now
    /// on create.
    #[serde(default)]
    pub last_created_at: Option<DateTime<Utc>>,
}

impl PlanRequest {
    /// Creates a request with the given operation, requester, and card.
    #[must_use]
    pub fn new(op: Operation, user_id: UserId, card_id: CardId) -> Self {
        Self {
            request_id: RequestId::new(),
            op: Some(op),
            user_id,
            card_id,
            interval: None,
            last_created_at: None,
        }
    }

    /// Sets the recurrence interval.
    #[must_use]
    pub const fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = Some(interval);
        self
    }

    /// Sets the last-materialized timestamp.
    #[must_use]
    pub const fn with_last_created(mut self, at: DateTime<Utc>) -> Self {
        self.last_created_at = Some(at);
        self
    }
}

/// Request to add or clear access bits for an (object, user) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRightRequest {
    /// Correlation id, echoed in the response.
    #[serde(default = "RequestId::new")]
    pub request_id: RequestId,
    /// Kind of the guarded object.
    pub object_kind: ObjectKind,
    /// Rowid of the guarded object.
    pub object_id: i64,
    /// The user whose rights change.
    pub user_id: UserId,
    /// The bits to add or clear.
    pub access: AccessType,
}

impl AccessRightRequest {
    /// Creates a request for the given object, user, and bits.
    #[must_use]
    pub fn new(object_kind: ObjectKind, object_id: i64, user_id: UserId, access: AccessType) -> Self {
        Self {
            request_id: RequestId::new(),
            object_kind,
            object_id,
            user_id,
            access,
        }
    }
}

/// Request to run the plan trigger engine (catch-up materialization).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanTriggerRequest {
    /// Correlation id, echoed in the response.
    #[serde(default = "RequestId::new")]
    pub request_id: RequestId,
}

impl PlanTriggerRequest {
    /// Creates a trigger request.
    #[must_use]
    pub fn new() -> Self {
        Self {
            request_id: RequestId::new(),
        }
    }
}

impl Default for PlanTriggerRequest {
    fn default() -> Self {
        Self::new()
    }
}

/// The closed set of request kinds the façade can route.
///
/// Routing is a match over this enum; an untyped payload that names no known
/// kind fails with `InvalidRequest` before reaching it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Request {
    /// Board operation.
    Board(BoardRequest),
    /// List operation.
    List(ListRequest),
    /// Card operation.
    Card(CardRequest),
    /// Tag operation.
    Tag(TagRequest),
    /// Plan operation.
    Plan(PlanRequest),
    /// Add access bits.
    AddAccessRight(AccessRightRequest),
    /// Clear access bits.
    RemoveAccessRight(AccessRightRequest),
    /// Run the plan trigger engine.
    PlanTrigger(PlanTriggerRequest),
}

impl Request {
    /// Returns the correlation id carried by the wrapped request.
    #[must_use]
    pub const fn request_id(&self) -> crate::domain::RequestId {
        match self {
            Self::Board(r) => r.request_id,
            Self::List(r) => r.request_id,
            Self::Card(r) => r.request_id,
            Self::Tag(r) => r.request_id,
            Self::Plan(r) => r.request_id,
            Self::AddAccessRight(r) | Self::RemoveAccessRight(r) => r.request_id,
            Self::PlanTrigger(r) => r.request_id,
        }
    }

    /// Returns a short label for the request kind, used in logs.
    #[must_use]
    pub const fn kind_label(&self) -> &'static str {
        match self {
            Self::Board(_) => "board",
            Self::List(_) => "list",
            Self::Card(_) => "card",
            Self::Tag(_) => "tag",
            Self::Plan(_) => "plan",
            Self::AddAccessRight(_) => "add_access_right",
            Self::RemoveAccessRight(_) => "remove_access_right",
            Self::PlanTrigger(_) => "plan_trigger",
        }
    }
}
