//! Module naming.
//!
//! The naming function is injected so hosts can impose their own
//! conventions, but it must be pure and deterministic: the same target id
//! always yields the same module name, independent of any map or set
//! iteration order. Module names drive entity identity, so an unstable
//! namer would churn the whole committed graph on every sync.

use crate::core::ids::TargetId;

/// Derives a stable module name from a target id.
pub trait ModuleNamer: Send + Sync {
    /// Compute the module name. Pure: same input, same output.
    fn module_name(&self, id: TargetId) -> String;
}

/// Default namer: flattens a build label into a dotted name.
///
/// `//server/app:main` becomes `server.app.main`; `@maven//:guava` becomes
/// `maven.guava`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LabelNamer;

impl ModuleNamer for LabelNamer {
    fn module_name(&self, id: TargetId) -> String {
        let mut out = String::with_capacity(id.as_str().len());
        for c in id.as_str().chars() {
            match c {
                '/' | ':' | '@' => {
                    if !out.is_empty() && !out.ends_with('.') {
                        out.push('.');
                    }
                }
                c => out.push(c),
            }
        }
        out.trim_matches('.').to_owned()
    }
}
