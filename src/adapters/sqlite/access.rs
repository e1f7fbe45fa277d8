//! Access-right persistence over SQLite.

use super::schema::access_rights;
use super::store::SqliteStore;
use crate::domain::{AccessType, ObjectKind, UserId};
use crate::ports::{AccessStore, StoreResult};
use diesel::prelude::*;

impl AccessStore for SqliteStore {
    fn access_row(
        &self,
        kind: ObjectKind,
        object_id: i64,
        user_id: UserId,
    ) -> StoreResult<Option<AccessType>> {
        let mut conn = self.conn()?;
        let bits = access_rights::table
            .filter(access_rights::object_kind.eq(kind.as_str()))
            .filter(access_rights::object_id.eq(object_id))
            .filter(access_rights::user_id.eq(user_id.value()))
            .select(access_rights::access)
            .first::<i32>(&mut *conn)
            .optional()?;
        Ok(bits.map(|raw| AccessType::from_bits(u8::try_from(raw).unwrap_or(0))))
    }

    fn set_access(
        &self,
        kind: ObjectKind,
        object_id: i64,
        user_id: UserId,
        access: AccessType,
    ) -> StoreResult<()> {
        let mut conn = self.conn()?;
        diesel::replace_into(access_rights::table)
            .values((
                access_rights::object_kind.eq(kind.as_str()),
                access_rights::object_id.eq(object_id),
                access_rights::user_id.eq(user_id.value()),
                access_rights::access.eq(i32::from(access.bits())),
            ))
            .execute(&mut *conn)?;
        Ok(())
    }
}
