//! Access rights: the permission bitset and the kinds of objects it guards.
//!
//! Rights are opt-in restrictions layered on an open-by-default model: the
//! absence of an explicit row for an (object, user) pair means unrestricted
//! access, not no access. An explicit row narrows the user down to exactly
//! the bits it carries.

use super::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitAnd, BitOr, BitXor};

/// Permission bitset granted to one user for one object.
///
/// Two bits exist: `READ` and `WRITE`. `READ_WRITE` is their union and
/// `NONE` the empty set. Effective access to nested objects is the bitwise
/// AND of the object's own bits with every ancestor's bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessType(u8);

impl AccessType {
    /// No access at all.
    pub const NONE: Self = Self(0b00);
    /// Permission to read the object.
    pub const READ: Self = Self(0b01);
    /// Permission to modify or delete the object.
    pub const WRITE: Self = Self(0b10);
    /// Full access; also the implicit default when no explicit row exists.
    pub const READ_WRITE: Self = Self(0b11);

    const MASK: u8 = 0b11;

    /// Reconstructs a bitset from its stored representation, discarding
    /// unknown bits.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & Self::MASK)
    }

    /// Returns the raw bit representation.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Returns `true` when at least one of the required bits is present.
    #[must_use]
    pub const fn permits(self, required: Self) -> bool {
        self.0 & required.0 != 0
    }

    /// Returns `true` when no bits are set.
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }

    /// Adds the given bits to the set.
    #[must_use]
    pub const fn grant(self, bits: Self) -> Self {
        Self(self.0 | bits.0)
    }

    /// Clears the given bits. Implemented as `(current | bits) ^ bits` so
    /// that removing bits which were never set is a no-op rather than an
    /// accidental grant.
    #[must_use]
    pub const fn revoke(self, bits: Self) -> Self {
        Self((self.0 | bits.0) ^ bits.0)
    }

    /// Canonical textual form, used for logging.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self.0 {
            0b01 => "read",
            0b10 => "write",
            0b11 => "read_write",
            _ => "none",
        }
    }
}

impl BitAnd for AccessType {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl BitOr for AccessType {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitXor for AccessType {
    type Output = Self;

    fn bitxor(self, rhs: Self) -> Self {
        Self(self.0 ^ rhs.0)
    }
}

impl fmt::Display for AccessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of object an access right row is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    /// A board.
    Board,
    /// A cards list.
    List,
    /// A card.
    Card,
}

impl ObjectKind {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Board => "board",
            Self::List => "list",
            Self::Card => "card",
        }
    }
}

impl TryFrom<&str> for ObjectKind {
    type Error = DomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "board" => Ok(Self::Board),
            "list" => Ok(Self::List),
            "card" => Ok(Self::Card),
            _ => Err(DomainError::UnknownObjectKind(value.to_owned())),
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
