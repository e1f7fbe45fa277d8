//! Plan persistence over SQLite.

use super::models::{NewPlanRow, PlanRow};
use super::schema::plans;
use super::store::{SqliteStore, last_rowid};
use crate::domain::{CardId, Plan, PlanId};
use crate::ports::{PlanStore, StoreError, StoreResult};
use chrono::{DateTime, Duration, Utc};
use diesel::prelude::*;

impl PlanStore for SqliteStore {
    fn insert_plan(
        &self,
        card_id: CardId,
        interval: Duration,
        last_created_at: DateTime<Utc>,
    ) -> StoreResult<Plan> {
        let mut conn = self.conn()?;
        diesel::insert_into(plans::table)
            .values(NewPlanRow {
                card_id: card_id.value(),
                interval_seconds: interval.num_seconds(),
                last_created_at,
            })
            .execute(&mut *conn)?;
        let id = last_rowid(&mut conn)?;
        Ok(Plan {
            id: PlanId::from_raw(id),
            card_id,
            interval: Duration::seconds(interval.num_seconds()),
            last_created_at,
        })
    }

    fn update_plan(&self, plan: &Plan) -> StoreResult<Plan> {
        let mut conn = self.conn()?;
        let updated = diesel::update(plans::table.filter(plans::id.eq(plan.id.value())))
            .set((
                plans::card_id.eq(plan.card_id.value()),
                plans::interval_seconds.eq(plan.interval.num_seconds()),
                plans::last_created_at.eq(plan.last_created_at),
            ))
            .execute(&mut *conn)?;
        if updated == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(plan.clone())
    }

    fn find_plan_by_card(&self, card_id: CardId) -> StoreResult<Option<Plan>> {
        let mut conn = self.conn()?;
        let row = plans::table
            .filter(plans::card_id.eq(card_id.value()))
            .order(plans::id.asc())
            .select(PlanRow::as_select())
            .first::<PlanRow>(&mut *conn)
            .optional()?;
        Ok(row.map(Plan::from))
    }

    fn all_plans(&self) -> StoreResult<Vec<Plan>> {
        let mut conn = self.conn()?;
        let rows = plans::table
            .order(plans::id.asc())
            .select(PlanRow::as_select())
            .load::<PlanRow>(&mut *conn)?;
        Ok(rows.into_iter().map(Plan::from).collect())
    }

    fn set_plan_last_created(
        &self,
        id: PlanId,
        last_created_at: DateTime<Utc>,
    ) -> StoreResult<()> {
        let mut conn = self.conn()?;
        let updated = diesel::update(plans::table.filter(plans::id.eq(id.value())))
            .set(plans::last_created_at.eq(last_created_at))
            .execute(&mut *conn)?;
        if updated == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    fn delete_plan(&self, id: PlanId) -> StoreResult<()> {
        let mut conn = self.conn()?;
        let deleted =
            diesel::delete(plans::table.filter(plans::id.eq(id.value()))).execute(&mut *conn)?;
        if deleted == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
