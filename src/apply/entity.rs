//! The committed entity graph model.
//!
//! Entities are the host-visible persisted form of modules, roots and
//! libraries. Ids are deterministic functions of the owning module name
//! and the entity's own key, so re-running a sync over identical input
//! addresses exactly the same entities.

use std::fmt;
use std::path::PathBuf;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::descriptor::{ModuleDescriptor, ModuleKind, SdkHint};
use crate::core::target::TargetCapabilities;

/// Deterministic entity identifier.
///
/// A module entity's id is the module name; child ids are
/// `<module>::<kind>::<key>`. Module names never contain `::` (the naming
/// functions flatten labels with `.`), so the owning module is always
/// recoverable from the id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(String);

impl EntityId {
    /// Id of a module entity.
    pub fn module(name: &str) -> Self {
        EntityId(name.to_owned())
    }

    /// Id of a child entity under a module.
    pub fn child(module: &str, kind: &str, key: &str) -> Self {
        EntityId(format!("{module}::{kind}::{key}"))
    }

    /// The module that owns this entity.
    pub fn owning_module(&self) -> &str {
        match self.0.split_once("::") {
            Some((module, _)) => module,
            None => &self.0,
        }
    }

    /// The raw id string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Payload of one entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EntityPayload {
    Module {
        name: String,
        kind: ModuleKind,
        module_deps: Vec<String>,
        library_deps: Vec<String>,
        capabilities: TargetCapabilities,
    },
    SourceRoot {
        path: PathBuf,
        generated: bool,
        package_prefix: String,
    },
    ResourceRoot {
        path: PathBuf,
    },
    ExcludedRoot {
        path: PathBuf,
    },
    Library {
        name: String,
        interface_jars: Vec<PathBuf>,
        class_jars: Vec<PathBuf>,
        source_jars: Vec<PathBuf>,
    },
    SdkAddendum {
        hint: SdkHint,
    },
}

/// One entity in the committed graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    /// Parent entity (the owning module) for child entities.
    pub parent: Option<EntityId>,
    pub payload: EntityPayload,
}

impl Entity {
    /// Whether this is a module entity.
    pub fn is_module(&self) -> bool {
        matches!(self.payload, EntityPayload::Module { .. })
    }
}

/// A queryable point-in-time view of the committed graph, in insertion
/// order.
pub type EntitySnapshot = IndexMap<EntityId, Entity>;

/// Flatten a module descriptor into its entities, module first, children
/// in descriptor order.
pub fn entities_for(descriptor: &ModuleDescriptor) -> Vec<Entity> {
    let module_id = EntityId::module(&descriptor.name);
    let mut out = Vec::with_capacity(
        1 + descriptor.source_roots.len()
            + descriptor.resource_roots.len()
            + descriptor.excluded_roots.len()
            + descriptor.libraries.len(),
    );

    out.push(Entity {
        id: module_id.clone(),
        parent: None,
        payload: EntityPayload::Module {
            name: descriptor.name.clone(),
            kind: descriptor.kind,
            module_deps: descriptor.module_deps.clone(),
            library_deps: descriptor.library_deps.clone(),
            capabilities: descriptor.capabilities,
        },
    });

    for root in &descriptor.source_roots {
        out.push(Entity {
            id: EntityId::child(&descriptor.name, "src", &root.path.to_string_lossy()),
            parent: Some(module_id.clone()),
            payload: EntityPayload::SourceRoot {
                path: root.path.clone(),
                generated: root.generated,
                package_prefix: root.package_prefix.clone(),
            },
        });
    }

    for path in &descriptor.resource_roots {
        out.push(Entity {
            id: EntityId::child(&descriptor.name, "res", &path.to_string_lossy()),
            parent: Some(module_id.clone()),
            payload: EntityPayload::ResourceRoot { path: path.clone() },
        });
    }

    for path in &descriptor.excluded_roots {
        out.push(Entity {
            id: EntityId::child(&descriptor.name, "excl", &path.to_string_lossy()),
            parent: Some(module_id.clone()),
            payload: EntityPayload::ExcludedRoot { path: path.clone() },
        });
    }

    for library in &descriptor.libraries {
        out.push(Entity {
            id: EntityId::child(&descriptor.name, "lib", &library.name),
            parent: Some(module_id.clone()),
            payload: EntityPayload::Library {
                name: library.name.clone(),
                interface_jars: library.interface_jars.clone(),
                class_jars: library.class_jars.clone(),
                source_jars: library.source_jars.clone(),
            },
        });
    }

    if let Some(hint) = &descriptor.sdk_hint {
        out.push(Entity {
            id: EntityId::child(&descriptor.name, "sdk", "addendum"),
            parent: Some(module_id),
            payload: EntityPayload::SdkAddendum { hint: hint.clone() },
        });
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::descriptor::SourceRoot;

    #[test]
    fn test_entity_id_owning_module() {
        assert_eq!(EntityId::module("app.main").owning_module(), "app.main");
        assert_eq!(
            EntityId::child("app.main", "src", "/w/src").owning_module(),
            "app.main"
        );
    }

    #[test]
    fn test_entities_for_is_deterministic() {
        let mut descriptor = ModuleDescriptor::new("app.main", ModuleKind::Java);
        descriptor.source_roots.push(SourceRoot {
            path: PathBuf::from("/w/src"),
            generated: false,
            package_prefix: "com.acme".to_owned(),
        });
        descriptor.resource_roots.push(PathBuf::from("/w/res"));

        let first = entities_for(&descriptor);
        let second = entities_for(&descriptor);
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
        assert!(first[0].is_module());
        assert_eq!(first[1].parent, Some(EntityId::module("app.main")));
    }
}
