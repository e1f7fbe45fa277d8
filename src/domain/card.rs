//! Card: a single task.

use super::{CardId, DomainError, ListId, TagId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Task priority. Card reads are ordered by descending priority.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Background work.
    Low,
    /// The default for new cards.
    #[default]
    Medium,
    /// Urgent work.
    High,
}

impl Priority {
    /// Returns the canonical numeric representation (LOW=1, MEDIUM=50,
    /// HIGH=100).
    #[must_use]
    pub const fn value(self) -> i32 {
        match self {
            Self::Low => 1,
            Self::Medium => 50,
            Self::High => 100,
        }
    }

    /// Reconstructs a priority from its stored numeric value.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::UnknownPriority`] for values outside the
    /// canonical set.
    pub const fn from_value(value: i32) -> Result<Self, DomainError> {
        match value {
            1 => Ok(Self::Low),
            50 => Ok(Self::Medium),
            100 => Ok(Self::High),
            other => Err(DomainError::UnknownPriority(other)),
        }
    }
}

/// A single task.
///
/// Cards form a parent/child graph through [`Card::children`]. The engine
/// does not check that graph for cycles; callers that need acyclicity must
/// enforce it themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Card identifier.
    pub id: CardId,
    /// Card name.
    pub name: String,
    /// Task description.
    pub description: String,
    /// The user who created the card.
    pub user_id: UserId,
    /// The user the card is assigned to, if any.
    pub assignee_id: Option<UserId>,
    /// When the task should be done, if set.
    pub expiration_date: Option<DateTime<Utc>>,
    /// Task priority.
    pub priority: Priority,
    /// The list containing this card.
    pub list_id: ListId,
    /// Identifiers of child cards, in id order.
    pub children: Vec<CardId>,
    /// Identifiers of attached tags, in id order.
    pub tags: Vec<TagId>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the most recent write, refreshed by the engine on every
    /// card write.
    pub last_modified_at: DateTime<Utc>,
}
