//! JVM-family transformers: generic JVM, Java, Kotlin.
//!
//! These three share the full shared spine and differ only in the module
//! kind they stamp; they carry no SDK addendum.

use crate::core::descriptor::{ModuleDescriptor, ModuleKind};
use crate::core::target::BuildTarget;
use crate::resolver::Closure;
use crate::sync::error::SyncError;
use crate::transform::{shared, ModuleTransformer, TransformContext};

/// Generic JVM transformer; also the fallback for untagged targets.
pub struct JvmTransformer;

impl ModuleTransformer for JvmTransformer {
    fn kind(&self) -> ModuleKind {
        ModuleKind::Jvm
    }

    fn transform(
        &self,
        ctx: &TransformContext<'_>,
        target: &BuildTarget,
        closure: &Closure,
    ) -> Result<ModuleDescriptor, SyncError> {
        Ok(shared::base_descriptor(ctx, target, closure, self.kind()))
    }
}

/// Java transformer.
pub struct JavaTransformer;

impl ModuleTransformer for JavaTransformer {
    fn kind(&self) -> ModuleKind {
        ModuleKind::Java
    }

    fn transform(
        &self,
        ctx: &TransformContext<'_>,
        target: &BuildTarget,
        closure: &Closure,
    ) -> Result<ModuleDescriptor, SyncError> {
        Ok(shared::base_descriptor(ctx, target, closure, self.kind()))
    }
}

/// Kotlin transformer.
pub struct KotlinTransformer;

impl ModuleTransformer for KotlinTransformer {
    fn kind(&self) -> ModuleKind {
        ModuleKind::Kotlin
    }

    fn transform(
        &self,
        ctx: &TransformContext<'_>,
        target: &BuildTarget,
        closure: &Closure,
    ) -> Result<ModuleDescriptor, SyncError> {
        Ok(shared::base_descriptor(ctx, target, closure, self.kind()))
    }
}
