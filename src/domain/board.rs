//! Board: the top-level container owning cards lists.

use super::{BoardId, ListId};
use serde::{Deserialize, Serialize};

/// A board and the identifiers of the lists it owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// Board identifier.
    pub id: BoardId,
    /// Board name.
    pub name: String,
    /// Identifiers of the lists owned by this board, in id order.
    pub lists: Vec<ListId>,
}
