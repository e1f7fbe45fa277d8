//! Engine services: the access validator, one processor per entity kind,
//! and the plan trigger engine.
//!
//! Processors consult the access validator before touching state and return
//! the first error encountered; multi-row effects go through single atomic
//! store calls.

pub mod access;
pub mod board;
pub mod card;
mod error;
pub mod list;
pub mod plan;
pub mod tag;
pub mod trigger;

pub use error::{EngineError, EngineResult};
