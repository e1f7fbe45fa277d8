//! List processor: write, read, and delete operations against cards lists.

use crate::domain::{AccessType, CardsList};
use crate::ports::TrackerStore;
use crate::protocol::{ListRequest, Operation, ResponseBody};
use crate::services::access::{board_access, list_access};
use crate::services::{EngineError, EngineResult};

/// Routes a list request to its operation handler.
///
/// # Errors
///
/// Returns [`EngineError::OperationNotSpecified`] when the request carries
/// no operation tag, otherwise whatever the operation produces.
pub fn process<S: TrackerStore + ?Sized>(
    store: &S,
    request: &ListRequest,
) -> EngineResult<ResponseBody> {
    match request.op.ok_or(EngineError::OperationNotSpecified)? {
        Operation::Write => write(store, request),
        Operation::Read => read(store, request),
        Operation::Delete => delete(store, request),
    }
}

/// Resolves the targeted list: by id when given, else by name.
fn resolve<S: TrackerStore + ?Sized>(
    store: &S,
    request: &ListRequest,
) -> EngineResult<Option<CardsList>> {
    if let Some(id) = request.id {
        return Ok(store.find_list(id)?);
    }
    if let Some(name) = request.name.as_deref() {
        return Ok(store.find_list_by_name(name)?);
    }
    Ok(None)
}

fn write<S: TrackerStore + ?Sized>(store: &S, request: &ListRequest) -> EngineResult<ResponseBody> {
    if let Some(list) = resolve(store, request)? {
        if !list_access(store, &list, request.user_id)?.permits(AccessType::WRITE) {
            return Err(EngineError::AccessDenied);
        }
        if let Some(board_id) = request.board_id {
            store
                .find_board(board_id)?
                .ok_or(EngineError::BoardNotFound)?;
        }
        let updated = store.update_list(list.id, request.name.as_deref(), request.board_id)?;
        return Ok(ResponseBody::Lists(vec![updated]));
    }

    let name = request
        .name
        .as_deref()
        .ok_or_else(|| EngineError::invalid("list write requires a name to create"))?;
    let board_id = request
        .board_id
        .ok_or_else(|| EngineError::invalid("list write requires a board id to create"))?;
    store
        .find_board(board_id)?
        .ok_or(EngineError::BoardNotFound)?;
    if !board_access(store, board_id, request.user_id)?.permits(AccessType::WRITE) {
        return Err(EngineError::AccessDenied);
    }
    let list = store.insert_list(name, board_id, request.user_id)?;
    Ok(ResponseBody::Lists(vec![list]))
}

fn read<S: TrackerStore + ?Sized>(store: &S, request: &ListRequest) -> EngineResult<ResponseBody> {
    let mut candidates: Vec<CardsList> = if request.id.is_some() || request.name.is_some() {
        resolve(store, request)?.into_iter().collect()
    } else if let Some(board_id) = request.board_id {
        store
            .find_board(board_id)?
            .ok_or(EngineError::BoardNotFound)?;
        store.lists_in_board(board_id)?
    } else {
        store.all_lists()?
    };

    // A board filter combined with id/name narrows the resolved candidate.
    if request.id.is_some() || request.name.is_some() {
        if let Some(board_id) = request.board_id {
            candidates.retain(|list| list.board_id == Some(board_id));
        }
    }

    if candidates.is_empty() {
        return Err(EngineError::ListNotFound);
    }

    let mut readable = Vec::with_capacity(candidates.len());
    for list in candidates {
        if list_access(store, &list, request.user_id)?.permits(AccessType::READ) {
            readable.push(list);
        }
    }

    if readable.is_empty() {
        return Err(EngineError::AccessDenied);
    }
    Ok(ResponseBody::Lists(readable))
}

fn delete<S: TrackerStore + ?Sized>(
    store: &S,
    request: &ListRequest,
) -> EngineResult<ResponseBody> {
    let list = resolve(store, request)?.ok_or(EngineError::ListNotFound)?;
    // The global archived list is shared by every board and never deletable.
    if list.id == store.archived_list_id() {
        return Err(EngineError::AccessDenied);
    }
    if !list_access(store, &list, request.user_id)?.permits(AccessType::WRITE) {
        return Err(EngineError::AccessDenied);
    }
    store.delete_list(list.id)?;
    Ok(ResponseBody::Ack)
}
