//! Dependency closure resolution.
//!
//! Computes, per target, the transitively reachable dependency ids over the
//! mixed target/library graph. The walk is asymmetric on purpose: library
//! dependencies expand transitively (a compiled artifact pulls in every
//! artifact it was built against), while target dependencies are traversed
//! exactly one hop (a source target pulls in only its direct siblings).
//!
//! Resolution reads only the immutable target graph and is safe to run
//! concurrently for many targets without locks.

use std::collections::VecDeque;

use indexmap::IndexSet;

use crate::core::graph::TargetGraph;
use crate::core::ids::{LibraryId, TargetId};
use crate::core::target::BuildTarget;
use crate::util::Symbol;

/// The per-target closure, partitioned into module-level and library-level
/// dependencies. Both lists keep traversal order so everything derived from
/// them downstream is order-stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Closure {
    pub module_deps: Vec<TargetId>,
    pub library_deps: Vec<LibraryId>,
}

impl Closure {
    /// The empty closure.
    pub fn empty() -> Self {
        Closure::default()
    }

    /// Whether the closure has no dependencies at all.
    pub fn is_empty(&self) -> bool {
        self.module_deps.is_empty() && self.library_deps.is_empty()
    }
}

/// Resolve the dependency closure of one target.
///
/// The root target short-circuits to the empty closure regardless of its
/// declared dependencies. Ids that resolve to neither a target nor a
/// library in this snapshot are dropped silently; an id that resolves to
/// both is a reportable inconsistency and is treated as a target.
pub fn resolve(graph: &TargetGraph, target: &BuildTarget) -> Closure {
    if graph.root_target() == Some(target.id) {
        return Closure::empty();
    }

    let mut visited: IndexSet<Symbol> = IndexSet::new();
    let mut worklist: VecDeque<Symbol> = target.dependencies.iter().copied().collect();

    while let Some(id) = worklist.pop_front() {
        if !visited.insert(id) {
            continue;
        }

        let is_target = graph.contains_target(id);
        let is_library = graph.contains_library(id);

        if is_target && is_library {
            tracing::warn!(
                id = %id,
                "id names both a target and a library; preferring the target interpretation"
            );
            continue;
        }

        if is_target {
            // One hop only: sibling targets are not expanded further.
            continue;
        }

        if is_library {
            if let Some(record) = graph.library(LibraryId::from(id)) {
                for dep in &record.dependencies {
                    let sym = dep.symbol();
                    if !visited.contains(&sym) {
                        worklist.push_back(sym);
                    }
                }
            }
        }
        // Anything else is an unresolvable id: kept in `visited` so it is
        // not re-examined, but the partition below drops it.
    }

    // Partition by controlled intersection against the authoritative key
    // sets, never by inspecting the raw string. Target wins on collision,
    // consistent with the traversal above.
    let mut closure = Closure::empty();
    for id in visited {
        if graph.contains_target(id) {
            closure.module_deps.push(TargetId::from(id));
        } else if graph.contains_library(id) {
            closure.library_deps.push(LibraryId::from(id));
        }
    }
    closure
}
