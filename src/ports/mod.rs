//! Port contracts between the entity processors and the storage adapters.

mod store;

pub use store::{
    AccessStore, BoardStore, CardStore, ListStore, NewCard, PlanStore, StoreError, StoreResult,
    TagStore, TrackerStore,
};
