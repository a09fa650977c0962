//! Build-server protocol surface: capabilities, client trait, payloads.

pub mod capabilities;
pub mod client;
pub mod payloads;

pub use capabilities::ServerCapabilities;
pub use client::{BuildServerClient, QueryFailure, QueryResult};
