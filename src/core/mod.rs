//! Core data model for repofleet

pub mod manifest;
pub mod repo;

pub use manifest::Manifest;
pub use repo::{RepoRecord, RepoTable};
