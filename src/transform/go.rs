//! Go transformer.

use crate::core::descriptor::{ModuleDescriptor, ModuleKind, SdkHint};
use crate::core::target::{BuildTarget, LanguageData};
use crate::resolver::Closure;
use crate::sync::error::SyncError;
use crate::transform::{shared, ModuleTransformer, TransformContext};

/// Go transformer: shared spine plus an import-path hint.
///
/// The import path is structurally required. A Go target without one
/// cannot be represented as a module at all, so this transformer fails
/// fast for that target instead of substituting an empty value.
pub struct GoTransformer;

impl ModuleTransformer for GoTransformer {
    fn kind(&self) -> ModuleKind {
        ModuleKind::Go
    }

    fn transform(
        &self,
        ctx: &TransformContext<'_>,
        target: &BuildTarget,
        closure: &Closure,
    ) -> Result<ModuleDescriptor, SyncError> {
        let (import_path, sdk_home) = match &target.data {
            Some(LanguageData::Go {
                import_path: Some(path),
                sdk_home,
            }) => (path.clone(), sdk_home.clone()),
            _ => {
                return Err(SyncError::StructurallyInvalidTarget {
                    target: target.id,
                    reason: "go target has no resolvable import path".to_owned(),
                })
            }
        };

        let mut descriptor = shared::base_descriptor(ctx, target, closure, self.kind());
        descriptor.sdk_hint = Some(SdkHint::Go {
            import_path,
            sdk_home,
        });
        Ok(descriptor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::graph::{GraphParts, TargetGraph};
    use crate::core::ids::TargetId;
    use crate::core::target::LanguageTag;
    use crate::transform::naming::LabelNamer;
    use std::path::Path;

    fn run(target: BuildTarget) -> Result<ModuleDescriptor, SyncError> {
        let id = target.id;
        let graph = TargetGraph::assemble(
            "/w",
            GraphParts {
                targets: vec![target],
                ..Default::default()
            },
        );
        let namer = LabelNamer;
        let ctx = TransformContext {
            graph: &graph,
            namer: &namer,
            base_path: Path::new("/w"),
        };
        let t = graph.target(id).unwrap();
        let closure = crate::resolver::resolve(&graph, t);
        GoTransformer.transform(&ctx, t, &closure)
    }

    #[test]
    fn test_go_import_path_hint() {
        let target = BuildTarget::new(TargetId::new("//go:svc"), "/w/go")
            .with_languages(vec![LanguageTag::Go])
            .with_data(LanguageData::Go {
                import_path: Some("example.com/svc".to_owned()),
                sdk_home: None,
            });

        let descriptor = run(target).unwrap();
        match descriptor.sdk_hint {
            Some(SdkHint::Go { import_path, .. }) => {
                assert_eq!(import_path, "example.com/svc");
            }
            other => panic!("unexpected hint: {other:?}"),
        }
    }

    #[test]
    fn test_go_missing_import_path_is_structural_error() {
        let target = BuildTarget::new(TargetId::new("//go:bad"), "/w/go")
            .with_languages(vec![LanguageTag::Go]);

        let err = run(target).unwrap_err();
        assert!(matches!(
            err,
            SyncError::StructurallyInvalidTarget { .. }
        ));
    }
}
