//! Plan processor: upsert-by-card write, read, and delete of recurrence
//! plans.

use crate::domain::{AccessType, Card, Plan};
use crate::ports::TrackerStore;
use crate::protocol::{Operation, PlanRequest, ResponseBody};
use crate::services::access::card_access;
use crate::services::{EngineError, EngineResult};
use mockable::Clock;

/// Routes a plan request to its operation handler.
///
/// # Errors
///
/// Returns [`EngineError::CardNotFound`] when the owning card is missing and
/// [`EngineError::OperationNotSpecified`] when the request carries no
/// operation tag, otherwise whatever the operation produces.
pub fn process<S: TrackerStore + ?Sized, C: Clock>(
    store: &S,
    clock: &C,
    request: &PlanRequest,
) -> EngineResult<ResponseBody> {
    let card = store
        .find_card(request.card_id)?
        .ok_or(EngineError::CardNotFound)?;
    match request.op.ok_or(EngineError::OperationNotSpecified)? {
        Operation::Write => write(store, clock, request, &card),
        Operation::Read => read(store, request, &card),
        Operation::Delete => delete(store, request, &card),
    }
}

fn write<S: TrackerStore + ?Sized, C: Clock>(
    store: &S,
    clock: &C,
    request: &PlanRequest,
    card: &Card,
) -> EngineResult<ResponseBody> {
    if !card_access(store, card, request.user_id)?.permits(AccessType::WRITE) {
        return Err(EngineError::AccessDenied);
    }

    if let Some(mut plan) = store.find_plan_by_card(card.id)? {
        // Upsert-by-card: patch only the fields present in the request.
        if let Some(interval) = request.interval {
            Plan::validate_interval(interval)?;
            plan.interval = interval;
        }
        if let Some(last_created_at) = request.last_created_at {
            plan.last_created_at = last_created_at;
        }
        let updated = store.update_plan(&plan)?;
        return Ok(ResponseBody::Plan(updated));
    }

    let interval = request
        .interval
        .ok_or_else(|| EngineError::invalid("plan write requires an interval to create"))?;
    Plan::validate_interval(interval)?;
    let last_created_at = request.last_created_at.unwrap_or_else(|| clock.utc());
    let plan = store.insert_plan(card.id, interval, last_created_at)?;
    Ok(ResponseBody::Plan(plan))
}

fn read<S: TrackerStore + ?Sized>(
    store: &S,
    request: &PlanRequest,
    card: &Card,
) -> EngineResult<ResponseBody> {
    if !card_access(store, card, request.user_id)?.permits(AccessType::READ) {
        return Err(EngineError::AccessDenied);
    }
    let plan = store
        .find_plan_by_card(card.id)?
        .ok_or(EngineError::PlanNotFound)?;
    Ok(ResponseBody::Plan(plan))
}

fn delete<S: TrackerStore + ?Sized>(
    store: &S,
    request: &PlanRequest,
    card: &Card,
) -> EngineResult<ResponseBody> {
    if !card_access(store, card, request.user_id)?.permits(AccessType::WRITE) {
        return Err(EngineError::AccessDenied);
    }
    let plan = store
        .find_plan_by_card(card.id)?
        .ok_or(EngineError::PlanNotFound)?;
    store.delete_plan(plan.id)?;
    Ok(ResponseBody::Ack)
}
