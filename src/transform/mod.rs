//! Per-language module transformation.
//!
//! A closed registry of transformers, one per module kind, resolved at
//! startup; there is no runtime plugin discovery. Transformation over the
//! set of targets is data-parallel: each target reads only the immutable
//! target graph and its own closure.

pub mod android;
pub mod go;
pub mod jvm;
pub mod naming;
pub mod python;
pub mod scala;
pub mod shared;

use std::collections::HashMap;
use std::path::Path;

use rayon::prelude::*;

use crate::core::descriptor::{ModuleDescriptor, ModuleKind};
use crate::core::graph::TargetGraph;
use crate::core::target::BuildTarget;
use crate::resolver::{self, Closure};
use crate::sync::config::SyncConfig;
use crate::sync::error::SyncError;

pub use naming::{LabelNamer, ModuleNamer};

/// Read-only context threaded through every transformer call.
pub struct TransformContext<'a> {
    pub graph: &'a TargetGraph,
    pub namer: &'a dyn ModuleNamer,
    pub base_path: &'a Path,
}

/// Turns one target's raw data plus its closure into a module descriptor.
///
/// Transformers never fail on missing optional data (SDK info, library
/// lists); they substitute empty values. They do fail, for that target
/// only, when a structurally required field is absent.
pub trait ModuleTransformer: Send + Sync {
    /// The module kind this transformer handles.
    fn kind(&self) -> ModuleKind;

    /// Transform one target.
    fn transform(
        &self,
        ctx: &TransformContext<'_>,
        target: &BuildTarget,
        closure: &Closure,
    ) -> Result<ModuleDescriptor, SyncError>;
}

/// Registry of module transformers, keyed by module kind.
///
/// Construction never fails and registers every built-in transformer.
pub struct TransformerRegistry {
    transformers: HashMap<ModuleKind, Box<dyn ModuleTransformer>>,
}

impl TransformerRegistry {
    /// Create a registry with all built-in transformers.
    pub fn new() -> Self {
        let mut registry = TransformerRegistry {
            transformers: HashMap::new(),
        };
        registry.register(Box::new(jvm::JvmTransformer));
        registry.register(Box::new(jvm::JavaTransformer));
        registry.register(Box::new(jvm::KotlinTransformer));
        registry.register(Box::new(scala::ScalaTransformer));
        registry.register(Box::new(python::PythonTransformer));
        registry.register(Box::new(go::GoTransformer));
        registry.register(Box::new(android::AndroidTransformer));
        registry
    }

    /// Register a transformer, replacing any previous one for its kind.
    pub fn register(&mut self, transformer: Box<dyn ModuleTransformer>) {
        self.transformers.insert(transformer.kind(), transformer);
    }

    /// Get the transformer for a module kind, falling back to the generic
    /// JVM transformer for kinds with no registration.
    pub fn get(&self, kind: ModuleKind) -> Option<&dyn ModuleTransformer> {
        self.transformers
            .get(&kind)
            .or_else(|| self.transformers.get(&ModuleKind::Jvm))
            .map(|t| t.as_ref())
    }

    /// Number of registered transformers.
    pub fn len(&self) -> usize {
        self.transformers.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.transformers.is_empty()
    }
}

impl Default for TransformerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// One target's transformation output: its real module, if any, plus the
/// dummy modules synthesized for its single-file sources.
#[derive(Default)]
struct TransformedTarget {
    module: Option<ModuleDescriptor>,
    dummies: Vec<ModuleDescriptor>,
}

/// Transform every target in the graph into module descriptors.
///
/// Runs data-parallel over targets and restores target delivery order in
/// the output. Structurally invalid targets are logged and skipped; any
/// other error aborts the pass. Real modules are emitted first, in
/// delivery order; dummy modules from the single-file fallback follow,
/// so a dummy whose derived name is already taken by a real module is
/// dropped, never the other way round. Duplicates among real modules
/// keep the first occurrence with a warning.
pub fn transform_all(
    config: &SyncConfig,
    namer: &dyn ModuleNamer,
    registry: &TransformerRegistry,
    graph: &TargetGraph,
) -> Result<Vec<ModuleDescriptor>, SyncError> {
    if let Some(jobs) = config.transform_jobs {
        // Ignore the error if a global pool already exists.
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()
            .ok();
    }

    let ctx = TransformContext {
        graph,
        namer,
        base_path: config.base_path(),
    };

    let targets: Vec<&BuildTarget> = graph.targets().collect();
    let transformed: Vec<TransformedTarget> = targets
        .par_iter()
        .map(|target| transform_one(&ctx, registry, target))
        .collect::<Result<_, _>>()?;

    let mut out: Vec<ModuleDescriptor> = Vec::new();
    let mut dummies: Vec<ModuleDescriptor> = Vec::new();
    let mut seen: HashMap<String, ()> = HashMap::new();
    for item in transformed {
        if let Some(descriptor) = item.module {
            if seen.insert(descriptor.name.clone(), ()).is_some() {
                tracing::warn!(module = %descriptor.name, "duplicate module name; keeping first");
            } else {
                out.push(descriptor);
            }
        }
        dummies.extend(item.dummies);
    }
    for dummy in dummies {
        if seen.insert(dummy.name.clone(), ()).is_some() {
            tracing::debug!(module = %dummy.name, "module name already taken; dropping dummy");
            continue;
        }
        out.push(dummy);
    }
    Ok(out)
}

fn transform_one(
    ctx: &TransformContext<'_>,
    registry: &TransformerRegistry,
    target: &BuildTarget,
) -> Result<TransformedTarget, SyncError> {
    let closure = resolver::resolve(ctx.graph, target);
    let kind = ModuleKind::classify(target);
    let Some(transformer) = registry.get(kind) else {
        return Ok(TransformedTarget::default());
    };

    match transformer.transform(ctx, target, &closure) {
        Ok(descriptor) => Ok(TransformedTarget {
            module: Some(descriptor),
            dummies: shared::single_file_modules(ctx, target),
        }),
        Err(SyncError::StructurallyInvalidTarget { target, reason }) => {
            tracing::warn!(target = %target, reason, "skipping structurally invalid target");
            Ok(TransformedTarget::default())
        }
        Err(other) => Err(other),
    }
}
