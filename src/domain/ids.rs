//! Identifier newtypes for the tracker domain.
//!
//! Entity identifiers are `i64` rowids allocated by the store. Request
//! correlation identifiers are random UUIDs minted by the caller and echoed
//! back in every response.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! define_row_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a raw rowid.
            #[must_use]
            pub const fn from_raw(value: i64) -> Self {
                Self(value)
            }

            /// Returns the underlying rowid.
            #[must_use]
            pub const fn value(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_row_id!(
    /// Unique identifier of a board.
    BoardId
);
define_row_id!(
    /// Unique identifier of a cards list.
    ListId
);
define_row_id!(
    /// Unique identifier of a card.
    CardId
);
define_row_id!(
    /// Unique identifier of a tag.
    TagId
);
define_row_id!(
    /// Unique identifier of a recurrence plan.
    PlanId
);
define_row_id!(
    /// Identifier of a user. User records themselves live outside the engine;
    /// the engine only correlates access rights and ownership by this value.
    UserId
);

/// Correlation identifier carried by every request and echoed in its response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Creates a new random correlation identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a correlation identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
