//! Cards list: a container of cards within a board.

use super::{BoardId, CardId, ListId};
use serde::{Deserialize, Serialize};

/// Names of the lists every new board is created with.
pub const DEFAULT_LIST_NAMES: [&str; 3] = ["To Do", "In Progress", "Done"];

/// Name of the process-global archive list. It is created once when the
/// store is opened, belongs to no board, is shared by all boards, and can
/// never be deleted.
pub const ARCHIVED_LIST_NAME: &str = "Archived";

/// A list of cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardsList {
    /// List identifier.
    pub id: ListId,
    /// List name.
    pub name: String,
    /// The owning board. `None` only for the global archived list.
    pub board_id: Option<BoardId>,
    /// Identifiers of the cards in this list, in id order.
    pub cards: Vec<CardId>,
}

impl CardsList {
    /// Returns `true` when this is the global archived list.
    #[must_use]
    pub const fn is_archived(&self) -> bool {
        self.board_id.is_none()
    }
}
