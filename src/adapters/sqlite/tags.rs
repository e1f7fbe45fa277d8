//! Tag persistence over SQLite.

use super::models::{NewTagRow, TagRow};
use super::schema::{card_tags, tags};
use super::store::{SqliteStore, last_rowid};
use crate::domain::{Tag, TagId};
use crate::ports::{StoreError, StoreResult, TagStore};
use diesel::prelude::*;

impl TagStore for SqliteStore {
    fn insert_tag(&self, name: &str, color: Option<i32>) -> StoreResult<Tag> {
        let mut conn = self.conn()?;
        diesel::insert_into(tags::table)
            .values(NewTagRow {
                name: name.to_owned(),
                color,
            })
            .execute(&mut *conn)?;
        let id = last_rowid(&mut conn)?;
        Ok(Tag {
            id: TagId::from_raw(id),
            name: name.to_owned(),
            color,
        })
    }

    fn update_tag(&self, tag: &Tag) -> StoreResult<Tag> {
        let mut conn = self.conn()?;
        let updated = diesel::update(tags::table.filter(tags::id.eq(tag.id.value())))
            .set((tags::name.eq(&tag.name), tags::color.eq(tag.color)))
            .execute(&mut *conn)?;
        if updated == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(tag.clone())
    }

    fn find_tag(&self, id: TagId) -> StoreResult<Option<Tag>> {
        let mut conn = self.conn()?;
        let row = tags::table
            .filter(tags::id.eq(id.value()))
            .select(TagRow::as_select())
            .first::<TagRow>(&mut *conn)
            .optional()?;
        Ok(row.map(Tag::from))
    }

    fn find_tag_by_name(&self, name: &str) -> StoreResult<Option<Tag>> {
        let mut conn = self.conn()?;
        let row = tags::table
            .filter(tags::name.eq(name))
            .order(tags::id.asc())
            .select(TagRow::as_select())
            .first::<TagRow>(&mut *conn)
            .optional()?;
        Ok(row.map(Tag::from))
    }

    fn all_tags(&self) -> StoreResult<Vec<Tag>> {
        let mut conn = self.conn()?;
        let rows = tags::table
            .order(tags::id.asc())
            .select(TagRow::as_select())
            .load::<TagRow>(&mut *conn)?;
        Ok(rows.into_iter().map(Tag::from).collect())
    }

    fn delete_tag(&self, id: TagId) -> StoreResult<()> {
        let mut conn = self.conn()?;
        conn.transaction(|conn| {
            let deleted =
                diesel::delete(tags::table.filter(tags::id.eq(id.value()))).execute(conn)?;
            if deleted == 0 {
                return Err(StoreError::NotFound);
            }
            diesel::delete(card_tags::table.filter(card_tags::tag_id.eq(id.value())))
                .execute(conn)?;
            Ok(())
        })
    }
}
