//! Fleet context passed to command handlers
//!
//! Bundles the loaded repository table and the git runner into a single
//! struct so every command receives the same two things.

use std::sync::Arc;

use crate::core::repo::{RepoRecord, RepoTable};
use crate::git::CommandRunner;

/// State available to all command handlers.
///
/// Created once in `main()` after loading the configuration, then passed by
/// reference to whichever command runs.
#[derive(Clone)]
pub struct FleetContext {
    /// Every tracked repository, immutable for the whole run
    pub repos: RepoTable,
    /// Executes git for every per-repo operation
    pub runner: Arc<dyn CommandRunner>,
}

impl FleetContext {
    pub fn new(repos: RepoTable, runner: Arc<dyn CommandRunner>) -> Self {
        Self { repos, runner }
    }

    pub fn repos(&self) -> &[RepoRecord] {
        &self.repos
    }
}
