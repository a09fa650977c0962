//! Shared transformation steps.
//!
//! Every language transformer runs the same spine: derive the module name,
//! map the closure onto dependency descriptors, infer package prefixes,
//! filter roots to the workspace, and synthesize dummy modules for
//! single-file sources. Language variants layer their SDK hints on top.

use std::path::PathBuf;

use crate::core::descriptor::{AttachedLibrary, ModuleDescriptor, ModuleKind, SourceRoot};
use crate::core::graph::SourceItemKind;
use crate::core::target::BuildTarget;
use crate::resolver::Closure;
use crate::transform::TransformContext;
use crate::util::paths;

/// Run the shared steps and produce the base descriptor for a target.
///
/// Language transformers call this first and then attach their addendum.
pub fn base_descriptor(
    ctx: &TransformContext<'_>,
    target: &BuildTarget,
    closure: &Closure,
    kind: ModuleKind,
) -> ModuleDescriptor {
    let name = ctx.namer.module_name(target.id);
    let mut descriptor = ModuleDescriptor::new(name, kind);

    descriptor.capabilities = target.capabilities;

    // Closure order is traversal order; keep it for stable downstream
    // ordering.
    descriptor.module_deps = closure
        .module_deps
        .iter()
        .map(|id| ctx.namer.module_name(*id))
        .collect();

    let mut library_ids: Vec<_> = closure.library_deps.clone();
    for inferred in ctx.graph.inferred_library_deps_for(target.id) {
        if !library_ids.contains(inferred) {
            library_ids.push(*inferred);
        }
    }
    descriptor.library_deps = library_ids
        .iter()
        .map(|id| id.as_str().to_owned())
        .collect();
    descriptor.libraries = library_ids
        .iter()
        .filter_map(|id| ctx.graph.library(*id))
        .map(AttachedLibrary::from_record)
        .collect();

    descriptor.source_roots = source_roots(ctx, target);
    descriptor.resource_roots = resource_roots(ctx, target);

    if ctx.graph.root_target() == Some(target.id) {
        descriptor.excluded_roots = ctx.graph.aggregated_exclusions();
    }

    descriptor
}

/// Compute the source roots of a target.
///
/// Directory items become roots directly; file items contribute their
/// containing directory. Each root gets a package prefix inferred from the
/// deepest declared source root that contains it. Roots outside the project
/// base path are dropped (servers sometimes report roots from other
/// workspaces), and duplicates keep their first occurrence.
fn source_roots(ctx: &TransformContext<'_>, target: &BuildTarget) -> Vec<SourceRoot> {
    let Some(sources) = ctx.graph.sources_for(target.id) else {
        return Vec::new();
    };

    let mut out: Vec<SourceRoot> = Vec::new();
    for item in &sources.items {
        let dir = match item.kind {
            SourceItemKind::Directory => item.path.clone(),
            SourceItemKind::File => match item.path.parent() {
                Some(parent) => parent.to_path_buf(),
                None => continue,
            },
        };
        if !paths::is_inside(ctx.base_path, &dir) {
            continue;
        }
        if out.iter().any(|root| root.path == dir) {
            continue;
        }
        let package_prefix = paths::infer_package_prefix(&sources.roots, &dir);
        out.push(SourceRoot {
            path: dir,
            generated: item.generated,
            package_prefix,
        });
    }
    out
}

/// Compute the resource roots of a target: filtered to the workspace,
/// deduplicated, first occurrence wins.
fn resource_roots(ctx: &TransformContext<'_>, target: &BuildTarget) -> Vec<PathBuf> {
    let mut out: Vec<PathBuf> = Vec::new();
    for path in ctx.graph.resources_for(target.id) {
        if !paths::is_inside(ctx.base_path, path) {
            continue;
        }
        if !out.contains(path) {
            out.push(path.clone());
        }
    }
    out
}

/// Synthesize dummy modules for single-file sources.
///
/// A target whose source items are individual files gets one extra module
/// per distinct containing directory, re-derived by stripping the inferred
/// package-prefix segments from the file's directory. This lets the host's
/// resolution machinery treat loose files as belonging to a
/// directory-rooted module. Dummy modules carry no dependencies; one whose
/// computed name would be empty is dropped, not synthesized.
pub fn single_file_modules(
    ctx: &TransformContext<'_>,
    target: &BuildTarget,
) -> Vec<ModuleDescriptor> {
    let Some(sources) = ctx.graph.sources_for(target.id) else {
        return Vec::new();
    };

    let kind = ModuleKind::classify(target);
    let mut out: Vec<ModuleDescriptor> = Vec::new();
    let mut seen_dirs: Vec<PathBuf> = Vec::new();

    for item in &sources.items {
        if item.kind != SourceItemKind::File {
            continue;
        }
        let Some(dir) = item.path.parent() else {
            continue;
        };
        let prefix = paths::infer_package_prefix(&sources.roots, dir);
        let root_dir = paths::strip_package_suffix(dir, &prefix);
        if seen_dirs.contains(&root_dir) {
            continue;
        }
        seen_dirs.push(root_dir.clone());

        let Some(name) = paths::dotted_relative(ctx.base_path, &root_dir) else {
            // Outside the workspace, or the workspace root itself: the
            // name would be empty, so no dummy module.
            continue;
        };

        let mut dummy = ModuleDescriptor::new(name, kind);
        dummy.source_roots.push(SourceRoot {
            path: root_dir,
            generated: item.generated,
            package_prefix: String::new(),
        });
        out.push(dummy);
    }
    out
}
