//! Scala transformer.

use crate::core::descriptor::{ModuleDescriptor, ModuleKind, SdkHint};
use crate::core::target::{BuildTarget, LanguageData};
use crate::resolver::Closure;
use crate::sync::error::SyncError;
use crate::transform::{shared, ModuleTransformer, TransformContext};

/// Scala transformer: shared spine plus a compiler addendum derived from
/// the target's sidecar data. Missing sidecar data is not an error; the
/// module simply carries no hint and the caller observes degraded
/// capability.
pub struct ScalaTransformer;

impl ModuleTransformer for ScalaTransformer {
    fn kind(&self) -> ModuleKind {
        ModuleKind::Scala
    }

    fn transform(
        &self,
        ctx: &TransformContext<'_>,
        target: &BuildTarget,
        closure: &Closure,
    ) -> Result<ModuleDescriptor, SyncError> {
        let mut descriptor = shared::base_descriptor(ctx, target, closure, self.kind());

        descriptor.sdk_hint = match &target.data {
            Some(LanguageData::Scala {
                compiler_version,
                compiler_jars,
            }) => Some(SdkHint::Scala {
                compiler_version: compiler_version.clone(),
                compiler_jars: compiler_jars.clone(),
            }),
            _ => None,
        };

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
    use std::path::{Path, PathBuf};

    fn run(target: BuildTarget) -> ModuleDescriptor {
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
        ScalaTransformer.transform(&ctx, t, &closure).unwrap()
    }

    #[test]
    fn test_scala_sdk_hint() {
        let target = BuildTarget::new(TargetId::new("//s:s"), "/w/s")
            .with_languages(vec![LanguageTag::Scala])
            .with_data(LanguageData::Scala {
                compiler_version: Some(semver::Version::new(2, 13, 12)),
                compiler_jars: vec![PathBuf::from("/sdk/scala-compiler.jar")],
            });

        let descriptor = run(target);
        match descriptor.sdk_hint {
            Some(SdkHint::Scala {
                compiler_version: Some(v),
                compiler_jars,
            }) => {
                assert_eq!(v, semver::Version::new(2, 13, 12));
                assert_eq!(compiler_jars.len(), 1);
            }
            other => panic!("unexpected hint: {other:?}"),
        }
    }

    #[test]
    fn test_scala_missing_data_yields_no_hint() {
        let target = BuildTarget::new(TargetId::new("//s:bare"), "/w/s")
            .with_languages(vec![LanguageTag::Scala]);

        let descriptor = run(target);
        assert!(descriptor.sdk_hint.is_none());
    }
}
