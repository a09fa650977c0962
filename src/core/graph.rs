//! The per-sync target graph snapshot.
//!
//! Assembled once by the query orchestrator and immutable afterwards: the
//! closure resolver and the transformers read it concurrently without
//! locks. Target delivery order is preserved (insertion-ordered maps)
//! because it drives the relative order of module descriptors and, through
//! them, the staging order of the entity transaction.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::ids::{LibraryId, TargetId};
use crate::core::library::LibraryRecord;
use crate::core::target::BuildTarget;
use crate::util::Symbol;

/// Kind of a reported source item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceItemKind {
    File,
    Directory,
}

/// One source item of a target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceItem {
    pub path: PathBuf,
    pub kind: SourceItemKind,
    pub generated: bool,
}

impl SourceItem {
    /// A non-generated directory item.
    pub fn directory(path: impl Into<PathBuf>) -> Self {
        SourceItem {
            path: path.into(),
            kind: SourceItemKind::Directory,
            generated: false,
        }
    }

    /// A non-generated file item.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        SourceItem {
            path: path.into(),
            kind: SourceItemKind::File,
            generated: false,
        }
    }
}

/// Sources reported for one target: the items plus the declared source
/// roots used for package-prefix inference.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TargetSources {
    pub items: Vec<SourceItem>,
    pub roots: Vec<PathBuf>,
}

/// Workspace directory scoping reported by the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceDirectories {
    pub included: Vec<PathBuf>,
    pub excluded: Vec<PathBuf>,
}

/// Raw per-query data handed to [`TargetGraph::assemble`].
///
/// `None` means the query was capability-gated off or failed; the graph
/// treats both the same way (the field stays empty).
#[derive(Debug, Default)]
pub struct GraphParts {
    pub targets: Vec<BuildTarget>,
    pub sources: HashMap<TargetId, TargetSources>,
    pub libraries: Option<Vec<LibraryRecord>>,
    pub resources: Option<HashMap<TargetId, Vec<PathBuf>>>,
    pub dependency_sources: Option<HashMap<TargetId, Vec<PathBuf>>>,
    pub directories: Option<WorkspaceDirectories>,
    pub output_paths: Option<HashMap<TargetId, Vec<PathBuf>>>,
    pub jvm_binary_jars: Option<HashMap<TargetId, Vec<PathBuf>>>,
    /// Per-target compiler classpaths, merged from the javac/scalac option
    /// queries. Only populated when the libraries query did not run.
    pub inferred_classpaths: Option<Vec<(TargetId, Vec<PathBuf>)>>,
}

/// Immutable snapshot of targets and prebuilt-library records for one sync.
#[derive(Debug)]
pub struct TargetGraph {
    base_path: PathBuf,
    targets: IndexMap<TargetId, BuildTarget>,
    libraries: IndexMap<LibraryId, LibraryRecord>,
    sources: HashMap<TargetId, TargetSources>,
    resources: HashMap<TargetId, Vec<PathBuf>>,
    output_paths: HashMap<TargetId, Vec<PathBuf>>,
    jvm_binary_jars: HashMap<TargetId, Vec<PathBuf>>,
    inferred_library_deps: HashMap<TargetId, Vec<LibraryId>>,
    directories: Option<WorkspaceDirectories>,
    root: Option<TargetId>,
}

impl TargetGraph {
    /// Assemble the snapshot from raw query results.
    ///
    /// When the libraries query did not run, library records are
    /// synthesized from the per-target compiler classpaths (one record per
    /// distinct jar) and remembered as inferred library deps of the
    /// originating target. Dependency-source archives are distributed onto
    /// library records by matching `<stem>-sources` archives against class
    /// jar stems.
    pub fn assemble(base_path: impl Into<PathBuf>, parts: GraphParts) -> Self {
        let base_path = base_path.into();

        let mut targets: IndexMap<TargetId, BuildTarget> = IndexMap::new();
        for target in parts.targets {
            targets.insert(target.id, target);
        }

        let root = targets
            .values()
            .find(|t| t.base_directory == base_path)
            .map(|t| t.id);

        let mut libraries: IndexMap<LibraryId, LibraryRecord> = IndexMap::new();
        let mut inferred_library_deps: HashMap<TargetId, Vec<LibraryId>> = HashMap::new();

        if let Some(records) = parts.libraries {
            for record in records {
                libraries.insert(record.id, record);
            }
        } else if let Some(classpaths) = parts.inferred_classpaths {
            for (target, jars) in classpaths {
                let deps = inferred_library_deps.entry(target).or_default();
                for jar in jars {
                    let id = LibraryId::new(jar.to_string_lossy());
                    libraries
                        .entry(id)
                        .or_insert_with(|| LibraryRecord::new(id).with_class_jars(vec![jar]));
                    if !deps.contains(&id) {
                        deps.push(id);
                    }
                }
            }
        }

        if let Some(dependency_sources) = parts.dependency_sources {
            distribute_source_archives(&mut libraries, dependency_sources);
        }

        TargetGraph {
            base_path,
            targets,
            libraries,
            sources: parts.sources,
            resources: parts.resources.unwrap_or_default(),
            output_paths: parts.output_paths.unwrap_or_default(),
            jvm_binary_jars: parts.jvm_binary_jars.unwrap_or_default(),
            inferred_library_deps,
            directories: parts.directories,
            root,
        }
    }

    /// Project base path this snapshot was fetched for.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Targets in server delivery order.
    pub fn targets(&self) -> impl Iterator<Item = &BuildTarget> {
        self.targets.values()
    }

    /// Number of targets.
    pub fn target_count(&self) -> usize {
        self.targets.len()
    }

    /// Look up a target by id.
    pub fn target(&self, id: TargetId) -> Option<&BuildTarget> {
        self.targets.get(&id)
    }

    /// Look up a library by id.
    pub fn library(&self, id: LibraryId) -> Option<&LibraryRecord> {
        self.libraries.get(&id)
    }

    /// Check whether a raw id names a target in this snapshot.
    pub fn contains_target(&self, id: Symbol) -> bool {
        self.targets.contains_key(&TargetId::from(id))
    }

    /// Check whether a raw id names a library in this snapshot.
    pub fn contains_library(&self, id: Symbol) -> bool {
        self.libraries.contains_key(&LibraryId::from(id))
    }

    /// The root target (base directory equal to the project root), if any.
    pub fn root_target(&self) -> Option<TargetId> {
        self.root
    }

    /// Sources reported for a target.
    pub fn sources_for(&self, id: TargetId) -> Option<&TargetSources> {
        self.sources.get(&id)
    }

    /// Resource roots reported for a target.
    pub fn resources_for(&self, id: TargetId) -> &[PathBuf] {
        self.resources.get(&id).map_or(&[], Vec::as_slice)
    }

    /// JVM binary jars reported for a target.
    pub fn jvm_binary_jars_for(&self, id: TargetId) -> &[PathBuf] {
        self.jvm_binary_jars.get(&id).map_or(&[], Vec::as_slice)
    }

    /// Library deps inferred from compiler classpaths for a target.
    pub fn inferred_library_deps_for(&self, id: TargetId) -> &[LibraryId] {
        self.inferred_library_deps
            .get(&id)
            .map_or(&[], Vec::as_slice)
    }

    /// Workspace directory scoping, if the directories query ran.
    pub fn directories(&self) -> Option<&WorkspaceDirectories> {
        self.directories.as_ref()
    }

    /// Paths the root module excludes from indexing: the server-reported
    /// excluded directories followed by every target's declared output
    /// paths, in target delivery order, deduplicated.
    pub fn aggregated_exclusions(&self) -> Vec<PathBuf> {
        let mut out: Vec<PathBuf> = Vec::new();
        if let Some(dirs) = &self.directories {
            for path in &dirs.excluded {
                if !out.contains(path) {
                    out.push(path.clone());
                }
            }
        }
        for id in self.targets.keys() {
            if let Some(paths) = self.output_paths.get(id) {
                for path in paths {
                    if !out.contains(path) {
                        out.push(path.clone());
                    }
                }
            }
        }
        out
    }
}

/// Attach `<stem>-sources` archives to the library whose class jar carries
/// the matching stem. Archives with no matching library are dropped.
fn distribute_source_archives(
    libraries: &mut IndexMap<LibraryId, LibraryRecord>,
    dependency_sources: HashMap<TargetId, Vec<PathBuf>>,
) {
    let mut stem_to_library: HashMap<String, LibraryId> = HashMap::new();
    for record in libraries.values() {
        for jar in &record.class_jars {
            if let Some(stem) = jar.file_stem().and_then(|s| s.to_str()) {
                stem_to_library.entry(stem.to_owned()).or_insert(record.id);
            }
        }
    }

    for archives in dependency_sources.into_values() {
        for archive in archives {
            let Some(stem) = archive.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let Some(class_stem) = stem.strip_suffix("-sources") else {
                continue;
            };
            match stem_to_library.get(class_stem) {
                Some(id) => {
                    if let Some(record) = libraries.get_mut(id) {
                        if !record.source_jars.contains(&archive) {
                            record.source_jars.push(archive);
                        }
                    }
                }
                None => {
                    tracing::debug!(archive = %archive.display(), "no library for source archive");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(id: &str, base: &str) -> BuildTarget {
        BuildTarget::new(TargetId::new(id), base)
    }

    #[test]
    fn test_assemble_preserves_delivery_order() {
        let parts = GraphParts {
            targets: vec![
                target("//z:z", "/w/z"),
                target("//a:a", "/w/a"),
                target("//m:m", "/w/m"),
            ],
            ..Default::default()
        };
        let graph = TargetGraph::assemble("/w", parts);
        let ids: Vec<_> = graph.targets().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["//z:z", "//a:a", "//m:m"]);
    }

    #[test]
    fn test_root_detection() {
        let parts = GraphParts {
            targets: vec![target("//a:a", "/w/a"), target("//:workspace", "/w")],
            ..Default::default()
        };
        let graph = TargetGraph::assemble("/w", parts);
        assert_eq!(graph.root_target(), Some(TargetId::new("//:workspace")));
    }

    #[test]
    fn test_library_synthesis_from_classpaths() {
        let tid = TargetId::new("//a:a");
        let parts = GraphParts {
            targets: vec![target("//a:a", "/w/a")],
            inferred_classpaths: Some(vec![(
                tid,
                vec![
                    PathBuf::from("/cache/guava.jar"),
                    PathBuf::from("/cache/gson.jar"),
                    PathBuf::from("/cache/guava.jar"),
                ],
            )]),
            ..Default::default()
        };
        let graph = TargetGraph::assemble("/w", parts);

        assert!(graph.contains_library(Symbol::intern("/cache/guava.jar")));
        assert!(graph.contains_library(Symbol::intern("/cache/gson.jar")));
        let inferred = graph.inferred_library_deps_for(tid);
        assert_eq!(inferred.len(), 2);
    }

    #[test]
    fn test_source_archive_distribution() {
        let lib = LibraryRecord::new(LibraryId::new("@maven//:gson"))
            .with_class_jars(vec![PathBuf::from("/cache/gson-2.10.jar")]);
        let mut dependency_sources = HashMap::new();
        dependency_sources.insert(
            TargetId::new("//a:a"),
            vec![
                PathBuf::from("/cache/gson-2.10-sources.jar"),
                PathBuf::from("/cache/unrelated-sources.jar"),
            ],
        );
        let parts = GraphParts {
            targets: vec![target("//a:a", "/w/a")],
            libraries: Some(vec![lib]),
            dependency_sources: Some(dependency_sources),
            ..Default::default()
        };
        let graph = TargetGraph::assemble("/w", parts);

        let record = graph.library(LibraryId::new("@maven//:gson")).unwrap();
        assert_eq!(
            record.source_jars,
            vec![PathBuf::from("/cache/gson-2.10-sources.jar")]
        );
    }

    #[test]
    fn test_aggregated_exclusions_order_and_dedup() {
        let a = TargetId::new("//a:a");
        let b = TargetId::new("//b:b");
        let mut output_paths = HashMap::new();
        output_paths.insert(a, vec![PathBuf::from("/w/out/a"), PathBuf::from("/w/out")]);
        output_paths.insert(b, vec![PathBuf::from("/w/out")]);
        let parts = GraphParts {
            targets: vec![target("//a:a", "/w/a"), target("//b:b", "/w/b")],
            output_paths: Some(output_paths),
            directories: Some(WorkspaceDirectories {
                included: vec![],
                excluded: vec![PathBuf::from("/w/.cache")],
            }),
            ..Default::default()
        };
        let graph = TargetGraph::assemble("/w", parts);

        assert_eq!(
            graph.aggregated_exclusions(),
            vec![
                PathBuf::from("/w/.cache"),
                PathBuf::from("/w/out/a"),
                PathBuf::from("/w/out"),
            ]
        );
    }
}
