//! In-memory store for tests and ephemeral sessions.

mod store;

pub use store::InMemoryStore;
