//! Cards-list persistence over SQLite.

use super::models::{ListRow, NewListRow};
use super::schema::{card_lists, cards};
use super::store::{SqliteStore, delete_list_rows, insert_owner_access, last_rowid};
use crate::domain::{BoardId, CardId, CardsList, ListId, ObjectKind, UserId};
use crate::ports::{ListStore, StoreError, StoreResult};
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

fn assemble(conn: &mut SqliteConnection, row: ListRow) -> StoreResult<CardsList> {
    let card_ids = cards::table
        .filter(cards::list_id.eq(row.id))
        .order(cards::id.asc())
        .select(cards::id)
        .load::<i64>(conn)?;
    Ok(CardsList {
        id: ListId::from_raw(row.id),
        name: row.name,
        board_id: row.board_id.map(BoardId::from_raw),
        cards: card_ids.into_iter().map(CardId::from_raw).collect(),
    })
}

fn load_row(conn: &mut SqliteConnection, id: ListId) -> StoreResult<Option<ListRow>> {
    Ok(card_lists::table
        .filter(card_lists::id.eq(id.value()))
        .select(ListRow::as_select())
        .first::<ListRow>(conn)
        .optional()?)
}

impl ListStore for SqliteStore {
    fn insert_list(&self, name: &str, board_id: BoardId, owner: UserId) -> StoreResult<CardsList> {
        let mut conn = self.conn()?;
        conn.transaction(|conn| {
            diesel::insert_into(card_lists::table)
                .values(NewListRow {
                    name: name.to_owned(),
                    board_id: Some(board_id.value()),
                })
                .execute(conn)?;
            let id = last_rowid(conn)?;
            insert_owner_access(conn, ObjectKind::List, id, owner)?;
            assemble(
                conn,
                ListRow {
                    id,
                    name: name.to_owned(),
                    board_id: Some(board_id.value()),
                },
            )
        })
    }

    fn update_list(
        &self,
        id: ListId,
        name: Option<&str>,
        board_id: Option<BoardId>,
    ) -> StoreResult<CardsList> {
        let mut conn = self.conn()?;
        conn.transaction(|conn| {
            let mut row = load_row(conn, id)?.ok_or(StoreError::NotFound)?;
            if let Some(name) = name {
                name.clone_into(&mut row.name);
            }
            if let Some(board_id) = board_id {
                row.board_id = Some(board_id.value());
            }
            diesel::update(card_lists::table.filter(card_lists::id.eq(id.value())))
                .set((
                    card_lists::name.eq(&row.name),
                    card_lists::board_id.eq(row.board_id),
                ))
                .execute(conn)?;
            assemble(conn, row)
        })
    }

    fn find_list(&self, id: ListId) -> StoreResult<Option<CardsList>> {
        let mut conn = self.conn()?;
        let row = load_row(&mut conn, id)?;
        row.map(|row| assemble(&mut conn, row)).transpose()
    }

    fn find_list_by_name(&self, name: &str) -> StoreResult<Option<CardsList>> {
        let mut conn = self.conn()?;
        let row = card_lists::table
            .filter(card_lists::name.eq(name))
            .order(card_lists::id.asc())
            .select(ListRow::as_select())
            .first::<ListRow>(&mut *conn)
            .optional()?;
        row.map(|row| assemble(&mut conn, row)).transpose()
    }

    fn lists_in_board(&self, board_id: BoardId) -> StoreResult<Vec<CardsList>> {
        let mut conn = self.conn()?;
        let rows = card_lists::table
            .filter(card_lists::board_id.eq(board_id.value()))
            .order(card_lists::id.asc())
            .select(ListRow::as_select())
            .load::<ListRow>(&mut *conn)?;
        rows.into_iter()
            .map(|row| assemble(&mut conn, row))
            .collect()
    }

    fn all_lists(&self) -> StoreResult<Vec<CardsList>> {
        let mut conn = self.conn()?;
        let rows = card_lists::table
            .order(card_lists::id.asc())
            .select(ListRow::as_select())
            .load::<ListRow>(&mut *conn)?;
        rows.into_iter()
            .map(|row| assemble(&mut conn, row))
            .collect()
    }

    fn delete_list(&self, id: ListId) -> StoreResult<()> {
        let mut conn = self.conn()?;
        conn.transaction(|conn| {
            if load_row(conn, id)?.is_none() {
                return Err(StoreError::NotFound);
            }
            delete_list_rows(conn, id.value())
        })
    }

    fn archived_list_id(&self) -> ListId {
        self.archived()
    }
}
