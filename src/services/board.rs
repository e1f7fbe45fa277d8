//! Board processor: write, read, and delete operations against boards.

use crate::domain::{AccessType, Board};
use crate::ports::TrackerStore;
use crate::protocol::{BoardRequest, Operation, ResponseBody};
use crate::services::access::board_access;
use crate::services::{EngineError, EngineResult};

/// Routes a board request to its operation handler.
///
/// # Errors
///
/// Returns [`EngineError::OperationNotSpecified`] when the request carries
/// no operation tag, otherwise whatever the operation produces.
pub fn process<S: TrackerStore + ?Sized>(
    store: &S,
    request: &BoardRequest,
) -> EngineResult<ResponseBody> {
    match request.op.ok_or(EngineError::OperationNotSpecified)? {
        Operation::Write => write(store, request),
        Operation::Read => read(store, request),
        Operation::Delete => delete(store, request),
    }
}

/// Resolves the targeted board: by id when given, else by name.
fn resolve<S: TrackerStore + ?Sized>(
    store: &S,
    request: &BoardRequest,
) -> EngineResult<Option<Board>> {
    if let Some(id) = request.id {
        return Ok(store.find_board(id)?);
    }
    if let Some(name) = request.name.as_deref() {
        return Ok(store.find_board_by_name(name)?);
    }
    Ok(None)
}

fn write<S: TrackerStore + ?Sized>(
    store: &S,
    request: &BoardRequest,
) -> EngineResult<ResponseBody> {
    if let Some(board) = resolve(store, request)? {
        if !board_access(store, board.id, request.user_id)?.permits(AccessType::WRITE) {
            return Err(EngineError::AccessDenied);
        }
        let renamed = match request.name.as_deref() {
            Some(name) => store.rename_board(board.id, name)?,
            None => board,
        };
        return Ok(ResponseBody::Boards(vec![renamed]));
    }

    let name = request
        .name
        .as_deref()
        .ok_or_else(|| EngineError::invalid("board write requires a name to create"))?;
    let board = store.insert_board(name, request.user_id)?;
    Ok(ResponseBody::Boards(vec![board]))
}

fn read<S: TrackerStore + ?Sized>(store: &S, request: &BoardRequest) -> EngineResult<ResponseBody> {
    let candidates: Vec<Board> = if request.id.is_some() || request.name.is_some() {
        resolve(store, request)?.into_iter().collect()
    } else {
        store.all_boards()?
    };

    if candidates.is_empty() {
        return Err(EngineError::BoardNotFound);
    }

    let mut readable = Vec::with_capacity(candidates.len());
    for board in candidates {
        if board_access(store, board.id, request.user_id)?.permits(AccessType::READ) {
            readable.push(board);
        }
    }

    if readable.is_empty() {
        return Err(EngineError::AccessDenied);
    }
    Ok(ResponseBody::Boards(readable))
}

fn delete<S: TrackerStore + ?Sized>(
    store: &S,
    request: &BoardRequest,
) -> EngineResult<ResponseBody> {
    let board = resolve(store, request)?.ok_or(EngineError::BoardNotFound)?;
    if !board_access(store, board.id, request.user_id)?.permits(AccessType::WRITE) {
        return Err(EngineError::AccessDenied);
    }
    store.delete_board(board.id)?;
    Ok(ResponseBody::Ack)
}
