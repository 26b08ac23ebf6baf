//! repofleet - keep a fleet of tracked git repositories in sync
//!
//! Fetches, diffs, merges, switches branches and clones across every
//! repository listed in a configuration file, one concurrent task per
//! repository, and prints an aggregated success/failure report.

pub mod cli;
pub mod core;
pub mod git;
pub mod telemetry;
pub mod util;

pub use crate::core::manifest::Manifest;
pub use crate::core::repo::{RepoRecord, RepoTable};
