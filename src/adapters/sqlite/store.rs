//! SQLite-backed store: connection handling, schema bootstrap, and the
//! cascade helpers shared by the per-entity trait implementations.
//!
//! One connection guarded by a mutex serves the whole store; composite
//! operations run inside a single transaction on that connection.

use super::models::ListRow;
use super::schema::{access_rights, card_children, card_lists, card_tags, cards, plans};
use crate::domain::{ARCHIVED_LIST_NAME, AccessType, ListId, ObjectKind, UserId};
use crate::ports::{StoreError, StoreResult};
use diesel::connection::SimpleConnection;
use diesel::define_sql_function;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use std::sync::{Mutex, MutexGuard};

define_sql_function! {
    /// Rowid allocated by the most recent insert on this connection.
    fn last_insert_rowid() -> BigInt;
}

const SCHEMA_SQL: &str = "
    PRAGMA foreign_keys = ON;
    CREATE TABLE IF NOT EXISTS boards (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS card_lists (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        board_id BIGINT
    );
    CREATE TABLE IF NOT EXISTS cards (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        description TEXT NOT NULL,
        user_id BIGINT NOT NULL,
        assignee_id BIGINT,
        expiration_date TEXT,
        priority INTEGER NOT NULL,
        list_id BIGINT NOT NULL,
        created_at TEXT NOT NULL,
        last_modified_at TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS tags (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        color INTEGER
    );
    CREATE TABLE IF NOT EXISTS card_tags (
        card_id BIGINT NOT NULL,
        tag_id BIGINT NOT NULL,
        PRIMARY KEY (card_id, tag_id)
    );
    CREATE TABLE IF NOT EXISTS card_children (
        parent_id BIGINT NOT NULL,
        child_id BIGINT NOT NULL,
        PRIMARY KEY (parent_id, child_id)
    );
    CREATE TABLE IF NOT EXISTS plans (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        card_id BIGINT NOT NULL,
        interval_seconds BIGINT NOT NULL,
        last_created_at TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS access_rights (
        object_kind TEXT NOT NULL,
        object_id BIGINT NOT NULL,
        user_id BIGINT NOT NULL,
        access INTEGER NOT NULL,
        PRIMARY KEY (object_kind, object_id, user_id)
    );
";

impl From<diesel::result::Error> for StoreError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => Self::NotFound,
            other => Self::persistence(other),
        }
    }
}

/// SQLite-backed store over a single mutex-guarded connection.
pub struct SqliteStore {
    conn: Mutex<SqliteConnection>,
    archived_list_id: ListId,
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore")
            .field("archived_list_id", &self.archived_list_id)
            .finish_non_exhaustive()
    }
}

impl SqliteStore {
    /// Opens (or creates) the database at `path`, applying the schema and
    /// creating the global archived list when absent. `":memory:"` yields a
    /// private transient database.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when the database cannot be opened or
    /// the schema cannot be applied.
    pub fn open(path: &str) -> StoreResult<Self> {
        let mut conn = SqliteConnection::establish(path).map_err(StoreError::persistence)?;
        conn.batch_execute(SCHEMA_SQL)
            .map_err(StoreError::persistence)?;
        let archived_list_id = ensure_archived_list(&mut conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            archived_list_id,
        })
    }

    pub(super) fn conn(&self) -> StoreResult<MutexGuard<'_, SqliteConnection>> {
        self.conn
            .lock()
            .map_err(|err| StoreError::persistence(std::io::Error::other(err.to_string())))
    }

    pub(super) const fn archived(&self) -> ListId {
        self.archived_list_id
    }
}

/// Rowid allocated by the most recent insert on `conn`.
pub(super) fn last_rowid(conn: &mut SqliteConnection) -> StoreResult<i64> {
    Ok(diesel::select(last_insert_rowid()).get_result::<i64>(conn)?)
}

fn ensure_archived_list(conn: &mut SqliteConnection) -> StoreResult<ListId> {
    let existing = card_lists::table
        .filter(card_lists::board_id.is_null())
        .filter(card_lists::name.eq(ARCHIVED_LIST_NAME))
        .select(ListRow::as_select())
        .first::<ListRow>(conn)
        .optional()?;
    if let Some(row) = existing {
        return Ok(ListId::from_raw(row.id));
    }
    diesel::insert_into(card_lists::table)
        .values((
            card_lists::name.eq(ARCHIVED_LIST_NAME),
            card_lists::board_id.eq(None::<i64>),
        ))
        .execute(conn)?;
    let id = last_rowid(conn)?;
    Ok(ListId::from_raw(id))
}

/// Inserts the explicit owner access row created alongside a new container.
pub(super) fn insert_owner_access(
    conn: &mut SqliteConnection,
    kind: ObjectKind,
    object_id: i64,
    owner: UserId,
) -> StoreResult<()> {
    diesel::insert_into(access_rights::table)
        .values((
            access_rights::object_kind.eq(kind.as_str()),
            access_rights::object_id.eq(object_id),
            access_rights::user_id.eq(owner.value()),
            access_rights::access.eq(i32::from(AccessType::READ_WRITE.bits())),
        ))
        .execute(conn)?;
    Ok(())
}

/// Deletes the access rows guarding one object.
pub(super) fn delete_access_rows(
    conn: &mut SqliteConnection,
    kind: ObjectKind,
    object_id: i64,
) -> StoreResult<()> {
    diesel::delete(
        access_rights::table
            .filter(access_rights::object_kind.eq(kind.as_str()))
            .filter(access_rights::object_id.eq(object_id)),
    )
    .execute(conn)?;
    Ok(())
}

/// Deletes a card together with its links, plan, and access rows. Runs
/// inside the caller's transaction.
pub(super) fn delete_card_rows(conn: &mut SqliteConnection, card_id: i64) -> StoreResult<()> {
    diesel::delete(card_tags::table.filter(card_tags::card_id.eq(card_id))).execute(conn)?;
    diesel::delete(
        card_children::table.filter(
            card_children::parent_id
                .eq(card_id)
                .or(card_children::child_id.eq(card_id)),
        ),
    )
    .execute(conn)?;
    diesel::delete(plans::table.filter(plans::card_id.eq(card_id))).execute(conn)?;
    delete_access_rows(conn, ObjectKind::Card, card_id)?;
    diesel::delete(cards::table.filter(cards::id.eq(card_id))).execute(conn)?;
    Ok(())
}

/// Deletes a list together with its cards and access rows. Runs inside the
/// caller's transaction.
pub(super) fn delete_list_rows(conn: &mut SqliteConnection, list_id: i64) -> StoreResult<()> {
    let card_ids = cards::table
        .filter(cards::list_id.eq(list_id))
        .select(cards::id)
        .load::<i64>(conn)?;
    for card_id in card_ids {
        delete_card_rows(conn, card_id)?;
    }
    delete_access_rows(conn, ObjectKind::List, list_id)?;
    diesel::delete(card_lists::table.filter(card_lists::id.eq(list_id))).execute(conn)?;
    Ok(())
}
