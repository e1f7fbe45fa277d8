//! Cascading access validation and right management.
//!
//! An object with no explicit access row is open (`READ_WRITE`). Effective
//! access to a list is the board's access ANDed with the list's own row;
//! effective access to a card is the list's effective access ANDed with the
//! card's own row. The global archived list has no board, so its board
//! factor is open.

use crate::domain::{AccessType, BoardId, Card, CardsList, ObjectKind, UserId};
use crate::ports::TrackerStore;
use crate::services::{EngineError, EngineResult};

/// Access assumed for an (object, user) pair with no explicit row.
pub const OPEN_ACCESS: AccessType = AccessType::READ_WRITE;

fn row_or_open<S: TrackerStore + ?Sized>(
    store: &S,
    kind: ObjectKind,
    object_id: i64,
    user_id: UserId,
) -> EngineResult<AccessType> {
    Ok(store
        .access_row(kind, object_id, user_id)?
        .unwrap_or(OPEN_ACCESS))
}

/// Computes a user's access to a board.
///
/// # Errors
///
/// Returns [`EngineError::Store`] when the store fails.
pub fn board_access<S: TrackerStore + ?Sized>(
    store: &S,
    board_id: BoardId,
    user_id: UserId,
) -> EngineResult<AccessType> {
    row_or_open(store, ObjectKind::Board, board_id.value(), user_id)
}

/// Computes a user's effective access to a list, including the board factor.
///
/// # Errors
///
/// Returns [`EngineError::Store`] when the store fails.
pub fn list_access<S: TrackerStore + ?Sized>(
    store: &S,
    list: &CardsList,
    user_id: UserId,
) -> EngineResult<AccessType> {
    let board_factor = match list.board_id {
        Some(board_id) => board_access(store, board_id, user_id)?,
        None => OPEN_ACCESS,
    };
    let own = row_or_open(store, ObjectKind::List, list.id.value(), user_id)?;
    Ok(board_factor & own)
}

/// Computes a user's effective access to a card, including the list and
/// board factors.
///
/// # Errors
///
/// Returns [`EngineError::ListNotFound`] when the containing list is missing
/// and [`EngineError::Store`] when the store fails.
pub fn card_access<S: TrackerStore + ?Sized>(
    store: &S,
    card: &Card,
    user_id: UserId,
) -> EngineResult<AccessType> {
    let list = store
        .find_list(card.list_id)?
        .ok_or(EngineError::ListNotFound)?;
    let list_factor = list_access(store, &list, user_id)?;
    let own = row_or_open(store, ObjectKind::Card, card.id.value(), user_id)?;
    Ok(list_factor & own)
}

/// Computes a user's effective access to an arbitrary object.
///
/// # Errors
///
/// Returns the object's NotExist error when it is missing and
/// [`EngineError::Store`] when the store fails.
pub fn effective_access<S: TrackerStore + ?Sized>(
    store: &S,
    kind: ObjectKind,
    object_id: i64,
    user_id: UserId,
) -> EngineResult<AccessType> {
    match kind {
        ObjectKind::Board => {
            let board_id = BoardId::from_raw(object_id);
            store
                .find_board(board_id)?
                .ok_or(EngineError::BoardNotFound)?;
            board_access(store, board_id, user_id)
        }
        ObjectKind::List => {
            let list = store
                .find_list(crate::domain::ListId::from_raw(object_id))?
                .ok_or(EngineError::ListNotFound)?;
            list_access(store, &list, user_id)
        }
        ObjectKind::Card => {
            let card = store
                .find_card(crate::domain::CardId::from_raw(object_id))?
                .ok_or(EngineError::CardNotFound)?;
            card_access(store, &card, user_id)
        }
    }
}

/// Adds bits to the explicit row for an (object, user) pair, creating the
/// row with a `NONE` baseline when it does not exist. Creating a row turns
/// the pair from "unrestricted" into "exactly these bits".
///
/// # Errors
///
/// Returns [`EngineError::Store`] when the store fails.
pub fn grant<S: TrackerStore + ?Sized>(
    store: &S,
    kind: ObjectKind,
    object_id: i64,
    user_id: UserId,
    bits: AccessType,
) -> EngineResult<()> {
    let current = store
        .access_row(kind, object_id, user_id)?
        .unwrap_or(AccessType::NONE);
    store.set_access(kind, object_id, user_id, current.grant(bits))?;
    Ok(())
}

/// Clears bits on the explicit row for an (object, user) pair, creating the
/// row with a `NONE` baseline when it does not exist. Revoking from an
/// absent row therefore bans the pair outright.
///
/// # Errors
///
/// Returns [`EngineError::Store`] when the store fails.
pub fn revoke<S: TrackerStore + ?Sized>(
    store: &S,
    kind: ObjectKind,
    object_id: i64,
    user_id: UserId,
    bits: AccessType,
) -> EngineResult<()> {
    let current = store
        .access_row(kind, object_id, user_id)?
        .unwrap_or(AccessType::NONE);
    store.set_access(kind, object_id, user_id, current.revoke(bits))?;
    Ok(())
}
