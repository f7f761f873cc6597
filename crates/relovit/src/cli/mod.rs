//! Command implementations.

pub mod config;
pub mod enrich;
pub mod identify;
pub mod types;
