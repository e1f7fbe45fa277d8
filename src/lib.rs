//! Corkboard: hierarchical task-tracking storage engine.
//!
//! This crate stores boards of task cards, guards every object with
//! per-user access rights, and materializes recurring cards from plans.
//! Callers drive it through typed requests dispatched by the [`Tracker`]
//! façade; each request is answered synchronously with a response echoing
//! its correlation id.
//!
//! # Architecture
//!
//! Corkboard follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for persistence
//! - **Adapters**: Concrete store implementations (SQLite, in-memory)
//! - **Services**: The access validator, per-entity processors, and the
//!   plan trigger engine
//!
//! # Modules
//!
//! - [`domain`]: Entities, identifiers, and the permission bitset
//! - [`ports`]: The storage contract
//! - [`adapters`]: SQLite and in-memory stores
//! - [`services`]: Request processing and access validation
//! - [`protocol`]: Request and response envelopes
//! - [`facade`]: The [`Tracker`] entry point

pub mod adapters;
pub mod domain;
pub mod facade;
pub mod ports;
pub mod protocol;
pub mod services;

pub use facade::Tracker;

#[cfg(test)]
mod tests;
