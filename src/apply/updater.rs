//! Incremental entity graph application.

use indexmap::IndexMap;

use crate::apply::entity::{entities_for, Entity, EntityId};
use crate::apply::store::EntityStore;
use crate::core::descriptor::ModuleDescriptor;
use crate::sync::error::SyncError;

/// Summary of one applied sync.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppliedDiff {
    /// Entities that did not exist before.
    pub added: usize,
    /// Entities whose value changed.
    pub updated: usize,
    /// Entities left untouched because the new value was byte-equal.
    pub reused: usize,
    /// Entities removed because their module (or the entity itself)
    /// disappeared.
    pub removed: usize,
    /// Module names applied, in staging order.
    pub modules: Vec<String>,
}

/// Diff the committed graph against the new descriptors and apply the
/// result in one atomic transaction.
///
/// Unchanged entities are reused rather than recreated, so host-side state
/// keyed by entity identity (editor state, caches) survives a no-op sync.
/// Modules are staged in descriptor order, which the caller derives from
/// target delivery order; the store's insertion semantics carry that order
/// through to the committed graph. On any staging or commit error the
/// transaction is discarded and the previous graph stays authoritative.
pub fn apply(
    store: &mut dyn EntityStore,
    descriptors: &[ModuleDescriptor],
) -> Result<AppliedDiff, SyncError> {
    let previous = store.snapshot();

    let mut incoming: IndexMap<EntityId, Entity> = IndexMap::new();
    for descriptor in descriptors {
        for entity in entities_for(descriptor) {
            incoming.insert(entity.id.clone(), entity);
        }
    }

    let mut diff = AppliedDiff {
        modules: descriptors.iter().map(|d| d.name.clone()).collect(),
        ..Default::default()
    };

    let staged = stage(store, &previous, incoming, &mut diff);
    if let Err(source) = staged {
        store.discard();
        return Err(SyncError::TransactionStagingFailed { source });
    }

    if let Err(source) = store.commit() {
        store.discard();
        return Err(SyncError::TransactionStagingFailed { source });
    }

    Ok(diff)
}

fn stage(
    store: &mut dyn EntityStore,
    previous: &IndexMap<EntityId, Entity>,
    incoming: IndexMap<EntityId, Entity>,
    diff: &mut AppliedDiff,
) -> anyhow::Result<()> {
    // Upserts first, in descriptor order.
    for (id, entity) in &incoming {
        match previous.get(id) {
            Some(existing) if existing == entity => diff.reused += 1,
            Some(_) => {
                store.stage_upsert(entity.clone())?;
                diff.updated += 1;
            }
            None => {
                store.stage_upsert(entity.clone())?;
                diff.added += 1;
            }
        }
    }

    // Then removals: anything the new graph no longer contains. Reverse
    // snapshot order removes children before their module.
    for id in previous.keys().rev() {
        if !incoming.contains_key(id) {
            store.stage_remove(id.clone())?;
            diff.removed += 1;
        }
    }

    Ok(())
}
