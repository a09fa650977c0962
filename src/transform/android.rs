//! Android transformer.

use crate::core::descriptor::{AttachedLibrary, ModuleDescriptor, ModuleKind, SdkHint};
use crate::core::target::{BuildTarget, LanguageData};
use crate::resolver::Closure;
use crate::sync::error::SyncError;
use crate::transform::{shared, ModuleTransformer, TransformContext};

/// Android transformer: shared spine, an Android addendum, and the
/// target's JVM binary jars attached as an extra library (the jars query
/// only runs on android-capable servers).
pub struct AndroidTransformer;

impl ModuleTransformer for AndroidTransformer {
    fn kind(&self) -> ModuleKind {
        ModuleKind::Android
    }

    fn transform(
        &self,
        ctx: &TransformContext<'_>,
        target: &BuildTarget,
        closure: &Closure,
    ) -> Result<ModuleDescriptor, SyncError> {
        let mut descriptor = shared::base_descriptor(ctx, target, closure, self.kind());

        descriptor.sdk_hint = match &target.data {
            Some(LanguageData::Android {
                target_type,
                manifest,
            }) => Some(SdkHint::Android {
                target_type: *target_type,
                manifest: manifest.clone(),
            }),
            _ => None,
        };

        let binary_jars = ctx.graph.jvm_binary_jars_for(target.id);
        if !binary_jars.is_empty() {
            descriptor.libraries.push(AttachedLibrary {
                name: format!("{}.jvm-binary-jars", descriptor.name),
                interface_jars: Vec::new(),
                class_jars: binary_jars.to_vec(),
                source_jars: Vec::new(),
            });
        }

        Ok(descriptor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::graph::{GraphParts, TargetGraph};
    use crate::core::ids::TargetId;
    use crate::core::target::{AndroidTargetType, LanguageTag};
    use crate::transform::naming::LabelNamer;
    use std::collections::HashMap;
    use std::path::{Path, PathBuf};

    #[test]
    fn test_android_hint_and_binary_jars() {
        let id = TargetId::new("//app:android");
        let target = BuildTarget::new(id, "/w/app")
            .with_languages(vec![LanguageTag::Android, LanguageTag::Java])
            .with_data(LanguageData::Android {
                target_type: AndroidTargetType::App,
                manifest: Some(PathBuf::from("/w/app/AndroidManifest.xml")),
            });
        let mut jvm_binary_jars = HashMap::new();
        jvm_binary_jars.insert(id, vec![PathBuf::from("/out/app_deploy.jar")]);
        let graph = TargetGraph::assemble(
            "/w",
            GraphParts {
                targets: vec![target],
                jvm_binary_jars: Some(jvm_binary_jars),
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

        let descriptor = AndroidTransformer.transform(&ctx, t, &closure).unwrap();
        assert!(matches!(
            descriptor.sdk_hint,
            Some(SdkHint::Android {
                target_type: AndroidTargetType::App,
                ..
            })
        ));
        assert_eq!(descriptor.libraries.len(), 1);
        assert_eq!(descriptor.libraries[0].name, "app.android.jvm-binary-jars");
    }

    #[test]
    fn test_android_missing_data_yields_no_hint() {
        let id = TargetId::new("//app:android");
        let target =
            BuildTarget::new(id, "/w/app").with_languages(vec![LanguageTag::Android]);
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

        let descriptor = AndroidTransformer.transform(&ctx, t, &closure).unwrap();
        assert!(descriptor.sdk_hint.is_none());
        assert!(descriptor.libraries.is_empty());
    }
}
