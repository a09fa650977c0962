//! Incremental application of module descriptors to the host entity store.

pub mod entity;
pub mod store;
pub mod updater;

pub use entity::{entities_for, Entity, EntityId, EntityPayload, EntitySnapshot};
pub use store::{EntityStore, InMemoryEntityStore};
pub use updater::{apply, AppliedDiff};
