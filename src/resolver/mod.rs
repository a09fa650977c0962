//! Dependency closure resolution over the target graph.

pub mod closure;

pub use closure::{resolve, Closure};
