//! Card processor: write, read, and delete operations against cards.
//!
//! Card writes reconcile two link sets: children (skipping requested
//! children the requester cannot read) and tags (replaced to exactly match
//! the requested set). Reconciliation is a validation pass followed by one
//! atomic store call, so a failed write leaves no partial side effects.

use crate::domain::{AccessType, Card, CardId, ListId, Priority, TagId};
use crate::ports::{NewCard, TrackerStore};
use crate::protocol::{CardRequest, Operation, ResponseBody};
use crate::services::access::{card_access, list_access};
use crate::services::{EngineError, EngineResult};
use mockable::Clock;

/// Routes a card request to its operation handler.
///
/// # Errors
///
/// Returns [`EngineError::OperationNotSpecified`] when the request carries
/// no operation tag, otherwise whatever the operation produces.
pub fn process<S: TrackerStore + ?Sized, C: Clock>(
    store: &S,
    clock: &C,
    request: &CardRequest,
) -> EngineResult<ResponseBody> {
    match request.op.ok_or(EngineError::OperationNotSpecified)? {
        Operation::Write => write(store, clock, request),
        Operation::Read => read(store, request),
        Operation::Delete => delete(store, request),
    }
}

/// Resolves the targeted card: by id when given, else by name.
fn resolve<S: TrackerStore + ?Sized>(
    store: &S,
    request: &CardRequest,
) -> EngineResult<Option<Card>> {
    if let Some(id) = request.id {
        return Ok(store.find_card(id)?);
    }
    if let Some(name) = request.name.as_deref() {
        for card in store.all_cards()? {
            if card.name == name {
                return Ok(Some(card));
            }
        }
    }
    Ok(None)
}

/// Keeps only requested children that exist and that the requester can read.
/// The set is validated in full before anything is persisted.
fn admissible_children<S: TrackerStore + ?Sized>(
    store: &S,
    requested: &[CardId],
    user_id: crate::domain::UserId,
) -> EngineResult<Vec<CardId>> {
    let mut admitted = Vec::with_capacity(requested.len());
    for child_id in requested {
        let Some(child) = store.find_card(*child_id)? else {
            continue;
        };
        if card_access(store, &child, user_id)?.permits(AccessType::READ) {
            admitted.push(*child_id);
        }
    }
    Ok(admitted)
}

/// Keeps only requested tags that exist.
fn admissible_tags<S: TrackerStore + ?Sized>(
    store: &S,
    requested: &[TagId],
) -> EngineResult<Vec<TagId>> {
    let mut admitted = Vec::with_capacity(requested.len());
    for tag_id in requested {
        if store.find_tag(*tag_id)?.is_some() {
            admitted.push(*tag_id);
        }
    }
    Ok(admitted)
}

fn require_list<S: TrackerStore + ?Sized>(
    store: &S,
    list_id: ListId,
) -> EngineResult<crate::domain::CardsList> {
    store.find_list(list_id)?.ok_or(EngineError::ListNotFound)
}

fn write<S: TrackerStore + ?Sized, C: Clock>(
    store: &S,
    clock: &C,
    request: &CardRequest,
) -> EngineResult<ResponseBody> {
    if let Some(mut card) = resolve(store, request)? {
        if !card_access(store, &card, request.user_id)?.permits(AccessType::WRITE) {
            return Err(EngineError::AccessDenied);
        }
        if let Some(list_id) = request.list_id {
            require_list(store, list_id)?;
            card.list_id = list_id;
        }
        if let Some(name) = request.name.clone() {
            card.name = name;
        }
        if let Some(description) = request.description.clone() {
            card.description = description;
        }
        if let Some(expiration) = request.expiration_date {
            card.expiration_date = Some(expiration);
        }
        if let Some(priority) = request.priority {
            card.priority = priority;
        }
        if let Some(assignee) = request.assignee_id {
            card.assignee_id = Some(assignee);
        }
        if let Some(children) = request.children.as_deref() {
            card.children = admissible_children(store, children, request.user_id)?;
        }
        if let Some(tags) = request.tags.as_deref() {
            card.tags = admissible_tags(store, tags)?;
        }
        card.last_modified_at = clock.utc();
        let updated = store.update_card(&card)?;
        return Ok(ResponseBody::Cards(vec![updated]));
    }

    let name = request
        .name
        .as_deref()
        .ok_or_else(|| EngineError::invalid("card write requires a name to create"))?;
    let list_id = request
        .list_id
        .ok_or_else(|| EngineError::invalid("card write requires a list id to create"))?;
    let list = require_list(store, list_id)?;
    if !list_access(store, &list, request.user_id)?.permits(AccessType::WRITE) {
        return Err(EngineError::AccessDenied);
    }

    let children = match request.children.as_deref() {
        Some(requested) => admissible_children(store, requested, request.user_id)?,
        None => Vec::new(),
    };
    let tags = match request.tags.as_deref() {
        Some(requested) => admissible_tags(store, requested)?,
        None => Vec::new(),
    };

    let now = clock.utc();
    let card = store.insert_card(
        NewCard {
            name: name.to_owned(),
            description: request.description.clone().unwrap_or_default(),
            user_id: request.user_id,
            assignee_id: request.assignee_id,
            expiration_date: request.expiration_date,
            priority: request.priority.unwrap_or(Priority::Medium),
            list_id,
            created_at: now,
            last_modified_at: now,
        },
        &tags,
        &children,
    )?;
    Ok(ResponseBody::Cards(vec![card]))
}

fn read<S: TrackerStore + ?Sized>(store: &S, request: &CardRequest) -> EngineResult<ResponseBody> {
    let mut candidates: Vec<Card> = if let Some(id) = request.id {
        store.find_card(id)?.into_iter().collect()
    } else if let Some(tag_id) = request.tag_id {
        store.cards_with_tag(tag_id)?
    } else if let Some(list_id) = request.list_id {
        require_list(store, list_id)?;
        store.cards_in_list(list_id)?
    } else {
        store.all_cards()?
    };

    if let Some(name) = request.name.as_deref() {
        if request.id.is_none() {
            candidates.retain(|card| card.name == name);
        }
    }
    if let Some(list_id) = request.list_id {
        candidates.retain(|card| card.list_id == list_id);
    }
    if let Some(tag_id) = request.tag_id {
        candidates.retain(|card| card.tags.contains(&tag_id));
    }
    if let Some(board_id) = request.board_id {
        let board = store
            .find_board(board_id)?
            .ok_or(EngineError::BoardNotFound)?;
        candidates.retain(|card| board.lists.contains(&card.list_id));
    }

    if candidates.is_empty() {
        return Err(EngineError::CardNotFound);
    }

    let mut readable = Vec::with_capacity(candidates.len());
    for card in candidates {
        if card_access(store, &card, request.user_id)?.permits(AccessType::READ) {
            readable.push(card);
        }
    }

    if readable.is_empty() {
        return Err(EngineError::AccessDenied);
    }
    readable.sort_by(|a, b| b.priority.cmp(&a.priority).then(a.id.cmp(&b.id)));
    Ok(ResponseBody::Cards(readable))
}

fn delete<S: TrackerStore + ?Sized>(
    store: &S,
    request: &CardRequest,
) -> EngineResult<ResponseBody> {
    let card = resolve(store, request)?.ok_or(EngineError::CardNotFound)?;
    if !card_access(store, &card, request.user_id)?.permits(AccessType::WRITE) {
        return Err(EngineError::AccessDenied);
    }
    store.delete_card(card.id)?;
    Ok(ResponseBody::Ack)
}
