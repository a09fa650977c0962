//! Python transformer.

use crate::core::descriptor::{ModuleDescriptor, ModuleKind, SdkHint};
use crate::core::target::{BuildTarget, LanguageData};
use crate::resolver::Closure;
use crate::sync::error::SyncError;
use crate::transform::{shared, ModuleTransformer, TransformContext};

/// Python transformer: shared spine plus an interpreter hint. Both the
/// interpreter path and the version may be absent independently.
pub struct PythonTransformer;

impl ModuleTransformer for PythonTransformer {
    fn kind(&self) -> ModuleKind {
        ModuleKind::Python
    }

    fn transform(
        &self,
        ctx: &TransformContext<'_>,
        target: &BuildTarget,
        closure: &Closure,
    ) -> Result<ModuleDescriptor, SyncError> {
        let mut descriptor = shared::base_descriptor(ctx, target, closure, self.kind());

        descriptor.sdk_hint = match &target.data {
            Some(LanguageData::Python {
                interpreter,
                version,
            }) => Some(SdkHint::Python {
                interpreter: interpreter.clone(),
                version: version.clone(),
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

    #[test]
    fn test_python_sdk_hint() {
        let target = BuildTarget::new(TargetId::new("//py:tool"), "/w/py")
            .with_languages(vec![LanguageTag::Python])
            .with_data(LanguageData::Python {
                interpreter: Some(PathBuf::from("/usr/bin/python3")),
                version: Some(semver::Version::new(3, 11, 4)),
            });
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
        let t = graph.target(TargetId::new("//py:tool")).unwrap();
        let closure = crate::resolver::resolve(&graph, t);

        let descriptor = PythonTransformer.transform(&ctx, t, &closure).unwrap();
        match descriptor.sdk_hint {
            Some(SdkHint::Python {
                interpreter: Some(path),
                version: Some(v),
            }) => {
                assert_eq!(path, PathBuf::from("/usr/bin/python3"));
                assert_eq!(v.major, 3);
            }
            other => panic!("unexpected hint: {other:?}"),
        }
    }
}
