//! Domain model for the tracker engine.
//!
//! Plain value records for boards, lists, cards, tags, and recurrence plans,
//! the access-rights bitset, and the identifier newtypes, with no
//! infrastructure concerns.

mod access;
mod board;
mod card;
mod card_list;
mod error;
mod ids;
pub mod plan;
mod tag;

pub use access::{AccessType, ObjectKind};
pub use board::Board;
pub use card::{Card, Priority};
pub use card_list::{ARCHIVED_LIST_NAME, CardsList, DEFAULT_LIST_NAMES};
pub use error::DomainError;
pub use ids::{BoardId, CardId, ListId, PlanId, RequestId, TagId, UserId};
pub use plan::{MIN_PLAN_INTERVAL_SECONDS, Plan, min_plan_interval};
pub use tag::Tag;
