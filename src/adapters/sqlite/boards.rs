//! Board persistence over SQLite.

use super::models::{BoardRow, NewBoardRow};
use super::schema::{boards, card_lists};
use super::store::{
    SqliteStore, delete_access_rows, delete_list_rows, insert_owner_access, last_rowid,
};
use crate::domain::{Board, BoardId, DEFAULT_LIST_NAMES, ListId, ObjectKind, UserId};
use crate::ports::{BoardStore, StoreError, StoreResult};
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

fn assemble(conn: &mut SqliteConnection, row: BoardRow) -> StoreResult<Board> {
    let list_ids = card_lists::table
        .filter(card_lists::board_id.eq(row.id))
        .order(card_lists::id.asc())
        .select(card_lists::id)
        .load::<i64>(conn)?;
    Ok(Board {
        id: BoardId::from_raw(row.id),
        name: row.name,
        lists: list_ids.into_iter().map(ListId::from_raw).collect(),
    })
}

impl BoardStore for SqliteStore {
    fn insert_board(&self, name: &str, owner: UserId) -> StoreResult<Board> {
        let mut conn = self.conn()?;
        conn.transaction(|conn| {
            diesel::insert_into(boards::table)
                .values(NewBoardRow {
                    name: name.to_owned(),
                })
                .execute(conn)?;
            let board_id = last_rowid(conn)?;
            for list_name in DEFAULT_LIST_NAMES {
                diesel::insert_into(card_lists::table)
                    .values((
                        card_lists::name.eq(list_name),
                        card_lists::board_id.eq(Some(board_id)),
                    ))
                    .execute(conn)?;
                let list_id = last_rowid(conn)?;
                insert_owner_access(conn, ObjectKind::List, list_id, owner)?;
            }
            insert_owner_access(conn, ObjectKind::Board, board_id, owner)?;
            assemble(
                conn,
                BoardRow {
                    id: board_id,
                    name: name.to_owned(),
                },
            )
        })
    }

    fn rename_board(&self, id: BoardId, name: &str) -> StoreResult<Board> {
        let mut conn = self.conn()?;
        let updated = diesel::update(boards::table.filter(boards::id.eq(id.value())))
            .set(boards::name.eq(name))
            .execute(&mut *conn)?;
        if updated == 0 {
            return Err(StoreError::NotFound);
        }
        assemble(
            &mut conn,
            BoardRow {
                id: id.value(),
                name: name.to_owned(),
            },
        )
    }

    fn find_board(&self, id: BoardId) -> StoreResult<Option<Board>> {
        let mut conn = self.conn()?;
        let row = boards::table
            .filter(boards::id.eq(id.value()))
            .select(BoardRow::as_select())
            .first::<BoardRow>(&mut *conn)
            .optional()?;
        row.map(|row| assemble(&mut conn, row)).transpose()
    }

    fn find_board_by_name(&self, name: &str) -> StoreResult<Option<Board>> {
        let mut conn = self.conn()?;
        let row = boards::table
            .filter(boards::name.eq(name))
            .order(boards::id.asc())
            .select(BoardRow::as_select())
            .first::<BoardRow>(&mut *conn)
            .optional()?;
        row.map(|row| assemble(&mut conn, row)).transpose()
    }

    fn all_boards(&self) -> StoreResult<Vec<Board>> {
        let mut conn = self.conn()?;
        let rows = boards::table
            .order(boards::id.asc())
            .select(BoardRow::as_select())
            .load::<BoardRow>(&mut *conn)?;
        rows.into_iter()
            .map(|row| assemble(&mut conn, row))
            .collect()
    }

    fn delete_board(&self, id: BoardId) -> StoreResult<()> {
        let mut conn = self.conn()?;
        conn.transaction(|conn| {
            let deleted =
                diesel::delete(boards::table.filter(boards::id.eq(id.value()))).execute(conn)?;
            if deleted == 0 {
                return Err(StoreError::NotFound);
            }
            let list_ids = card_lists::table
                .filter(card_lists::board_id.eq(id.value()))
                .select(card_lists::id)
                .load::<i64>(conn)?;
            for list_id in list_ids {
                delete_list_rows(conn, list_id)?;
            }
            delete_access_rows(conn, ObjectKind::Board, id.value())?;
            Ok(())
        })
    }
}
