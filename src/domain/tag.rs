//! Tag: a label attached to cards through a many-to-many relation.

use super::TagId;
use serde::{Deserialize, Serialize};

/// A tag. Tags are global: they carry no owner and no access rights.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Tag identifier.
    pub id: TagId,
    /// Tag name.
    pub name: String,
    /// Display color, encoded as the surrounding application sees fit.
    pub color: Option<i32>,
}
