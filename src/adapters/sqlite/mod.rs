//! SQLite store built on Diesel, one file per entity concern.

mod access;
mod boards;
mod cards;
mod lists;
mod models;
mod plans;
mod schema;
mod store;
mod tags;

pub use store::SqliteStore;
