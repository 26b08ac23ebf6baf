//! Repository records and remote lookup

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

use crate::core::manifest::RepoConfig;
use crate::util::expand_home;

/// Immutable table of tracked repositories, shared read-only by every task.
pub type RepoTable = Arc<[RepoRecord]>;

/// Errors resolving per-repo configuration
#[derive(Error, Debug)]
pub enum RepoError {
    #[error("no {role} remote configured for {repo}")]
    MissingRemote { role: RemoteRole, repo: String },
}

/// Semantic meaning of a remote, independent of its git alias.
///
/// The alias is often just `origin` after a clone, so the role is what tells
/// the canonical project apart from a personal fork.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RemoteRole {
    /// The canonical project
    Upstream,
    /// The operator's fork
    Mine,
    /// Anything else, e.g. an abandoned upstream kept for reference
    AdHoc(String),
}

impl From<String> for RemoteRole {
    fn from(sym: String) -> Self {
        match sym.as_str() {
            "upstream" => RemoteRole::Upstream,
            "mine" => RemoteRole::Mine,
            _ => RemoteRole::AdHoc(sym),
        }
    }
}

impl From<&str> for RemoteRole {
    fn from(sym: &str) -> Self {
        RemoteRole::from(sym.to_string())
    }
}

impl From<RemoteRole> for String {
    fn from(role: RemoteRole) -> Self {
        role.to_string()
    }
}

impl fmt::Display for RemoteRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteRole::Upstream => write!(f, "upstream"),
            RemoteRole::Mine => write!(f, "mine"),
            RemoteRole::AdHoc(sym) => write!(f, "{}", sym),
        }
    }
}

/// Which remote an operation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteSelector {
    Upstream,
    Mine,
    /// The repo's configured `remoteDefault`
    Default,
}

impl fmt::Display for RemoteSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteSelector::Upstream => write!(f, "upstream"),
            RemoteSelector::Mine => write!(f, "mine"),
            RemoteSelector::Default => write!(f, "default"),
        }
    }
}

/// A server-side remote of a tracked repo
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Remote {
    /// Semantic role (`upstream`, `mine`, or free-form)
    pub sym: RemoteRole,
    /// Name git uses for the remote
    pub alias: String,
    /// Remote URL
    pub url: String,
}

impl Remote {
    /// Remote-tracking ref for `branch`, e.g. `origin/master`
    pub fn tracking_ref(&self, branch: &str) -> String {
        format!("{}/{}", self.alias, branch)
    }
}

/// One tracked working copy with its folder resolved
#[derive(Debug, Clone)]
pub struct RepoRecord {
    /// Position in the table, shown in reports
    pub index: usize,
    /// Short project name
    pub name: String,
    /// Folder as written in the config (may start with `~`)
    pub folder: String,
    /// Folder with `~` expanded
    pub path: PathBuf,
    /// Configured remotes, in config order
    pub remotes: Vec<Remote>,
    /// Role of the remote this repo normally syncs against
    pub remote_default: RemoteRole,
    /// Canonical upstream branch
    pub branch_main: String,
    /// Branch checked out locally
    pub branch_use: String,
    /// Cloned on its own rather than embedded as a submodule
    pub standalone: bool,
}

impl RepoRecord {
    /// Build a record from its config entry, expanding `~` against `home`.
    pub fn from_config(index: usize, config: &RepoConfig, home: &Path) -> Self {
        let path = expand_home(&config.folder, home);
        let name = if config.name.is_empty() {
            path.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| config.folder.clone())
        } else {
            config.name.clone()
        };
        let branch_use = if config.branch_use.is_empty() {
            config.branch_main.clone()
        } else {
            config.branch_use.clone()
        };

        Self {
            index,
            name,
            folder: config.folder.clone(),
            path,
            remotes: config.remotes.clone(),
            remote_default: config.remote_default.clone(),
            branch_main: config.branch_main.clone(),
            branch_use,
            standalone: config.standalone,
        }
    }

    /// First remote with the given role.
    pub fn remote_by_role(&self, role: &RemoteRole) -> Result<&Remote, RepoError> {
        self.remotes
            .iter()
            .find(|r| &r.sym == role)
            .ok_or_else(|| RepoError::MissingRemote {
                role: role.clone(),
                repo: self.name.clone(),
            })
    }

    pub fn upstream(&self) -> Result<&Remote, RepoError> {
        self.remote_by_role(&RemoteRole::Upstream)
    }

    pub fn mine(&self) -> Result<&Remote, RepoError> {
        self.remote_by_role(&RemoteRole::Mine)
    }

    pub fn default_remote(&self) -> Result<&Remote, RepoError> {
        self.remote_by_role(&self.remote_default)
    }

    /// Resolve a selector to a configured remote
    pub fn remote_for(&self, selector: RemoteSelector) -> Result<&Remote, RepoError> {
        match selector {
            RemoteSelector::Upstream => self.upstream(),
            RemoteSelector::Mine => self.mine(),
            RemoteSelector::Default => self.default_remote(),
        }
    }

    /// Branch to compare against on `remote`.
    ///
    /// Personal branch variants never exist upstream, so upstream always
    /// compares `branch_main`. The fork always carries `branch_use`. For the
    /// default remote the role of the resolved remote decides; ad-hoc remotes
    /// fall back to `branch_main`.
    pub fn compare_branch(&self, selector: RemoteSelector, remote: &Remote) -> &str {
        match selector {
            RemoteSelector::Upstream => &self.branch_main,
            RemoteSelector::Mine => &self.branch_use,
            RemoteSelector::Default => match remote.sym {
                RemoteRole::Mine => &self.branch_use,
                RemoteRole::Upstream | RemoteRole::AdHoc(_) => &self.branch_main,
            },
        }
    }
}
