//! Diesel row models for the tracker tables.

use super::schema::{access_rights, boards, card_children, card_lists, card_tags, cards, plans, tags};
use crate::domain::{Card, CardId, ListId, Plan, PlanId, Priority, Tag, TagId, UserId};
use crate::ports::{StoreError, StoreResult};
use chrono::{DateTime, Duration, Utc};
use diesel::prelude::*;

/// Query result row for boards.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = boards)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct BoardRow {
    /// Board rowid.
    pub id: i64,
    /// Board name.
    pub name: String,
}

/// Insert model for boards.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = boards)]
pub struct NewBoardRow {
    /// Board name.
    pub name: String,
}

/// Query result row for cards lists.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = card_lists)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ListRow {
    /// List rowid.
    pub id: i64,
    /// List name.
    pub name: String,
    /// Owning board rowid, null for the archived list.
    pub board_id: Option<i64>,
}

/// Insert model for cards lists.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = card_lists)]
pub struct NewListRow {
    /// List name.
    pub name: String,
    /// Owning board rowid, null for the archived list.
    pub board_id: Option<i64>,
}

/// Query result row for cards.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = cards)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CardRow {
    /// Card rowid.
    pub id: i64,
    /// Card name.
    pub name: String,
    /// Task description.
    pub description: String,
    /// Creating user.
    pub user_id: i64,
    /// Assigned user, if any.
    pub assignee_id: Option<i64>,
    /// Expiration timestamp, if any.
    pub expiration_date: Option<DateTime<Utc>>,
    /// Priority as its canonical numeric value.
    pub priority: i32,
    /// Containing list rowid.
    pub list_id: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last-modification timestamp.
    pub last_modified_at: DateTime<Utc>,
}

impl CardRow {
    /// Converts a stored row plus its link sets into the domain card.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when the stored priority value is outside
    /// the canonical set.
    pub fn into_domain(self, children: Vec<CardId>, tags: Vec<TagId>) -> StoreResult<Card> {
        let priority = Priority::from_value(self.priority).map_err(StoreError::persistence)?;
        Ok(Card {
            id: CardId::from_raw(self.id),
            name: self.name,
            description: self.description,
            user_id: UserId::from_raw(self.user_id),
            assignee_id: self.assignee_id.map(UserId::from_raw),
            expiration_date: self.expiration_date,
            priority,
            list_id: ListId::from_raw(self.list_id),
            children,
            tags,
            created_at: self.created_at,
            last_modified_at: self.last_modified_at,
        })
    }
}

/// Insert model for cards.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = cards)]
pub struct NewCardRow {
    /// Card name.
    pub name: String,
    /// Task description.
    pub description: String,
    /// Creating user.
    pub user_id: i64,
    /// Assigned user, if any.
    pub assignee_id: Option<i64>,
    /// Expiration timestamp, if any.
    pub expiration_date: Option<DateTime<Utc>>,
    /// Priority as its canonical numeric value.
    pub priority: i32,
    /// Containing list rowid.
    pub list_id: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last-modification timestamp.
    pub last_modified_at: DateTime<Utc>,
}

/// Query result row for tags.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tags)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TagRow {
    /// Tag rowid.
    pub id: i64,
    /// Tag name.
    pub name: String,
    /// Display color, if any.
    pub color: Option<i32>,
}

impl From<TagRow> for Tag {
    fn from(row: TagRow) -> Self {
        Self {
            id: TagId::from_raw(row.id),
            name: row.name,
            color: row.color,
        }
    }
}

/// Insert model for tags.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tags)]
pub struct NewTagRow {
    /// Tag name.
    pub name: String,
    /// Display color, if any.
    pub color: Option<i32>,
}

/// Insert model for card-to-tag links.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = card_tags)]
pub struct NewCardTagRow {
    /// Linked card rowid.
    pub card_id: i64,
    /// Linked tag rowid.
    pub tag_id: i64,
}

/// Insert model for parent-to-child card links.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = card_children)]
pub struct NewCardChildRow {
    /// Parent card rowid.
    pub parent_id: i64,
    /// Child card rowid.
    pub child_id: i64,
}

/// Query result row for plans.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = plans)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PlanRow {
    /// Plan rowid.
    pub id: i64,
    /// Owning card rowid.
    pub card_id: i64,
    /// Recurrence interval in whole seconds.
    pub interval_seconds: i64,
    /// Timestamp of the most recent materialized occurrence.
    pub last_created_at: DateTime<Utc>,
}

impl From<PlanRow> for Plan {
    fn from(row: PlanRow) -> Self {
        Self {
            id: PlanId::from_raw(row.id),
            card_id: CardId::from_raw(row.card_id),
            interval: Duration::seconds(row.interval_seconds),
            last_created_at: row.last_created_at,
        }
    }
}

/// Insert model for plans.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = plans)]
pub struct NewPlanRow {
    /// Owning card rowid.
    pub card_id: i64,
    /// Recurrence interval in whole seconds.
    pub interval_seconds: i64,
    /// Timestamp of the most recent materialized occurrence.
    pub last_created_at: DateTime<Utc>,
}

/// Row model for explicit access rows, used for both queries and inserts.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = access_rights)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AccessRow {
    /// Kind of the guarded object.
    pub object_kind: String,
    /// Rowid of the guarded object.
    pub object_id: i64,
    /// The user the row applies to.
    pub user_id: i64,
    /// Permission bits.
    pub access: i32,
}
