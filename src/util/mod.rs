//! Shared utilities

pub mod interning;
pub mod paths;

pub use interning::Symbol;
