//! The host entity store seam, plus an in-memory reference store.

use anyhow::{bail, Result};
use indexmap::IndexMap;

use crate::apply::entity::{Entity, EntityId, EntitySnapshot};

/// The host's persisted entity graph.
//
// Staging and committing are separate so the updater can build the whole
// transaction before anything becomes visible: either `commit` applies
// every staged operation or `discard` drops them all. Exclusive access
// (`&mut self`) makes the store the single serialization point for
// concurrent syncs.
pub trait EntityStore {
    /// A point-in-time view of the committed graph.
    fn snapshot(&self) -> EntitySnapshot;

    /// Stage an insert-or-replace of one entity.
    fn stage_upsert(&mut self, entity: Entity) -> Result<()>;

    /// Stage the removal of one entity.
    fn stage_remove(&mut self, id: EntityId) -> Result<()>;

    /// Atomically apply every staged operation, in staging order.
    fn commit(&mut self) -> Result<()>;

    /// Drop every staged operation without applying anything.
    fn discard(&mut self);
}

#[derive(Debug, Clone)]
enum StagedOp {
    Upsert(Entity),
    Remove(EntityId),
}

/// In-memory reference implementation of [`EntityStore`].
///
/// Preserves insertion order across commits, which is what upholds the
/// engine's ordering guarantee end to end. Also used to test host
/// adapters: `with_stage_failure_after` injects a staging fault at a
/// chosen point so atomicity handling can be exercised.
#[derive(Debug, Default)]
pub struct InMemoryEntityStore {
    entities: IndexMap<EntityId, Entity>,
    staged: Vec<StagedOp>,
    fail_after: Option<usize>,
}

impl InMemoryEntityStore {
    /// Create an empty store.
    pub fn new() -> Self {
        InMemoryEntityStore::default()
    }

    /// Fail the nth staging call (zero-based) and every one after it.
    pub fn with_stage_failure_after(mut self, n: usize) -> Self {
        self.fail_after = Some(n);
        self
    }

    /// Number of committed entities.
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Committed module names, in insertion order.
    pub fn module_names(&self) -> Vec<String> {
        self.entities
            .values()
            .filter(|e| e.is_module())
            .map(|e| e.id.as_str().to_owned())
            .collect()
    }

    fn check_fault(&self) -> Result<()> {
        if let Some(n) = self.fail_after {
            if self.staged.len() >= n {
                bail!("injected staging failure after {n} operations");
            }
        }
        Ok(())
    }
}

impl EntityStore for InMemoryEntityStore {
    fn snapshot(&self) -> EntitySnapshot {
        self.entities.clone()
    }

    fn stage_upsert(&mut self, entity: Entity) -> Result<()> {
        self.check_fault()?;
        self.staged.push(StagedOp::Upsert(entity));
        Ok(())
    }

    fn stage_remove(&mut self, id: EntityId) -> Result<()> {
        self.check_fault()?;
        self.staged.push(StagedOp::Remove(id));
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        for op in self.staged.drain(..) {
            match op {
                StagedOp::Upsert(entity) => {
                    // IndexMap keeps the original position on replace, so
                    // updating an entity does not move it.
                    self.entities.insert(entity.id.clone(), entity);
                }
                StagedOp::Remove(id) => {
                    self.entities.shift_remove(&id);
                }
            }
        }
        Ok(())
    }

    fn discard(&mut self) {
        self.staged.clear();
    }
}
