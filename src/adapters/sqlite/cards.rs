//! Card persistence over SQLite.

use super::models::{CardRow, NewCardChildRow, NewCardRow, NewCardTagRow};
use super::schema::{card_children, card_tags, cards};
use super::store::{SqliteStore, delete_card_rows, last_rowid};
use crate::domain::{Card, CardId, ListId, TagId};
use crate::ports::{CardStore, NewCard, StoreError, StoreResult};
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

fn assemble(conn: &mut SqliteConnection, row: CardRow) -> StoreResult<Card> {
    let children = card_children::table
        .filter(card_children::parent_id.eq(row.id))
        .order(card_children::child_id.asc())
        .select(card_children::child_id)
        .load::<i64>(conn)?
        .into_iter()
        .map(CardId::from_raw)
        .collect();
    let tags = card_tags::table
        .filter(card_tags::card_id.eq(row.id))
        .order(card_tags::tag_id.asc())
        .select(card_tags::tag_id)
        .load::<i64>(conn)?
        .into_iter()
        .map(TagId::from_raw)
        .collect();
    row.into_domain(children, tags)
}

fn load_row(conn: &mut SqliteConnection, id: CardId) -> StoreResult<Option<CardRow>> {
    Ok(cards::table
        .filter(cards::id.eq(id.value()))
        .select(CardRow::as_select())
        .first::<CardRow>(conn)
        .optional()?)
}

fn write_links(
    conn: &mut SqliteConnection,
    card_id: i64,
    tags: &[TagId],
    children: &[CardId],
) -> StoreResult<()> {
    for tag_id in tags {
        diesel::insert_into(card_tags::table)
            .values(NewCardTagRow {
                card_id,
                tag_id: tag_id.value(),
            })
            .execute(conn)?;
    }
    for child_id in children {
        diesel::insert_into(card_children::table)
            .values(NewCardChildRow {
                parent_id: card_id,
                child_id: child_id.value(),
            })
            .execute(conn)?;
    }
    Ok(())
}

impl CardStore for SqliteStore {
    fn insert_card(&self, card: NewCard, tags: &[TagId], children: &[CardId]) -> StoreResult<Card> {
        let mut conn = self.conn()?;
        conn.transaction(|conn| {
            diesel::insert_into(cards::table)
                .values(NewCardRow {
                    name: card.name,
                    description: card.description,
                    user_id: card.user_id.value(),
                    assignee_id: card.assignee_id.map(crate::domain::UserId::value),
                    expiration_date: card.expiration_date,
                    priority: card.priority.value(),
                    list_id: card.list_id.value(),
                    created_at: card.created_at,
                    last_modified_at: card.last_modified_at,
                })
                .execute(conn)?;
            let id = last_rowid(conn)?;
            write_links(conn, id, tags, children)?;
            let row = load_row(conn, CardId::from_raw(id))?.ok_or(StoreError::NotFound)?;
            assemble(conn, row)
        })
    }

    fn update_card(&self, card: &Card) -> StoreResult<Card> {
        let mut conn = self.conn()?;
        conn.transaction(|conn| {
            let updated = diesel::update(cards::table.filter(cards::id.eq(card.id.value())))
                .set((
                    cards::name.eq(&card.name),
                    cards::description.eq(&card.description),
                    cards::user_id.eq(card.user_id.value()),
                    cards::assignee_id.eq(card.assignee_id.map(crate::domain::UserId::value)),
                    cards::expiration_date.eq(card.expiration_date),
                    cards::priority.eq(card.priority.value()),
                    cards::list_id.eq(card.list_id.value()),
                    cards::created_at.eq(card.created_at),
                    cards::last_modified_at.eq(card.last_modified_at),
                ))
                .execute(conn)?;
            if updated == 0 {
                return Err(StoreError::NotFound);
            }
            diesel::delete(card_tags::table.filter(card_tags::card_id.eq(card.id.value())))
                .execute(conn)?;
            diesel::delete(
                card_children::table.filter(card_children::parent_id.eq(card.id.value())),
            )
            .execute(conn)?;
            write_links(conn, card.id.value(), &card.tags, &card.children)?;
            let row = load_row(conn, card.id)?.ok_or(StoreError::NotFound)?;
            assemble(conn, row)
        })
    }

    fn find_card(&self, id: CardId) -> StoreResult<Option<Card>> {
        let mut conn = self.conn()?;
        let row = load_row(&mut conn, id)?;
        row.map(|row| assemble(&mut conn, row)).transpose()
    }

    fn cards_in_list(&self, list_id: ListId) -> StoreResult<Vec<Card>> {
        let mut conn = self.conn()?;
        let rows = cards::table
            .filter(cards::list_id.eq(list_id.value()))
            .order(cards::id.asc())
            .select(CardRow::as_select())
            .load::<CardRow>(&mut *conn)?;
        rows.into_iter()
            .map(|row| assemble(&mut conn, row))
            .collect()
    }

    fn cards_with_tag(&self, tag_id: TagId) -> StoreResult<Vec<Card>> {
        let mut conn = self.conn()?;
        let card_ids = card_tags::table
            .filter(card_tags::tag_id.eq(tag_id.value()))
            .order(card_tags::card_id.asc())
            .select(card_tags::card_id)
            .load::<i64>(&mut *conn)?;
        let rows = cards::table
            .filter(cards::id.eq_any(card_ids))
            .order(cards::id.asc())
            .select(CardRow::as_select())
            .load::<CardRow>(&mut *conn)?;
        rows.into_iter()
            .map(|row| assemble(&mut conn, row))
            .collect()
    }

    fn all_cards(&self) -> StoreResult<Vec<Card>> {
        let mut conn = self.conn()?;
        let rows = cards::table
            .order(cards::id.asc())
            .select(CardRow::as_select())
            .load::<CardRow>(&mut *conn)?;
        rows.into_iter()
            .map(|row| assemble(&mut conn, row))
            .collect()
    }

    fn delete_card(&self, id: CardId) -> StoreResult<()> {
        let mut conn = self.conn()?;
        conn.transaction(|conn| {
            if load_row(conn, id)?.is_none() {
                return Err(StoreError::NotFound);
            }
            delete_card_rows(conn, id.value())
        })
    }
}
