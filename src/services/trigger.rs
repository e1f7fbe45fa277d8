//! Plan trigger engine: catch-up materialization of recurring cards.
//!
//! Catch-up only: nothing runs on a background schedule. The surrounding
//! application invokes this through the `PlanTrigger` request, typically
//! once per incoming request.

use crate::ports::{NewCard, TrackerStore};
use crate::services::EngineResult;
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

/// Materializes every occurrence that has fallen due by `now`.
///
/// For each plan whose `last_created_at + interval` lies before `now`, a
/// fresh card is inserted per elapsed interval, cloned from the owning
/// card's current scalar fields with `created_at` set to the occurrence
/// time. Link sets are not cloned. The plan's `last_created_at` is advanced
/// by whole intervals and persisted once per plan.
///
/// Returns the number of cards created.
///
/// # Errors
///
/// Propagates store failures; a plan whose card row has vanished is skipped
/// with a warning instead.
pub fn materialize_due_cards<S: TrackerStore + ?Sized>(
    store: &S,
    now: DateTime<Utc>,
) -> EngineResult<usize> {
    let mut created = 0usize;

    for plan in store.all_plans()? {
        if plan.last_created_at + plan.interval >= now {
            continue;
        }
        let Some(card) = store.find_card(plan.card_id)? else {
            warn!(plan_id = %plan.id, card_id = %plan.card_id, "plan has no card, skipping");
            continue;
        };

        let mut last_created_at = plan.last_created_at;
        while last_created_at + plan.interval < now {
            store.insert_card(
                NewCard {
                    name: card.name.clone(),
                    description: card.description.clone(),
                    user_id: card.user_id,
                    assignee_id: card.assignee_id,
                    expiration_date: card.expiration_date,
                    priority: card.priority,
                    list_id: card.list_id,
                    created_at: last_created_at,
                    last_modified_at: last_created_at,
                },
                &[],
                &[],
            )?;
            last_created_at += plan.interval;
            created += 1;
        }
        store.set_plan_last_created(plan.id, last_created_at)?;
        debug!(plan_id = %plan.id, card_id = %plan.card_id, %last_created_at, "plan caught up");
    }

    Ok(created)
}
