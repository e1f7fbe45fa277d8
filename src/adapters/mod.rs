//! Storage adapters implementing the engine's port traits.

pub mod memory;
pub mod sqlite;
