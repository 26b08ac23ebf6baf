//! Test fixtures for creating fleet environments.
//!
//! Provides a `FleetBuilder` pattern for creating temporary fleets with bare
//! upstream remotes, optional personal forks, working copies and a
//! `repos.jsonc` listing them -- all offline.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

use repofleet::cli::FleetContext;
use repofleet::core::manifest::{Manifest, RepoConfig};
use repofleet::git::GitCli;
use repofleet::RepoTable;

use super::git_helpers;

/// Branch the fork carries personal changes on.
pub const USE_BRANCH: &str = "mine";

/// A test fleet with temporary directories that are cleaned up on drop.
pub struct FleetFixture {
    /// The temporary directory (holds working copies, remotes and config).
    /// Kept alive for the lifetime of the fixture.
    pub _temp: TempDir,
    /// Directory holding the working copies.
    pub fleet_dir: PathBuf,
    /// Directory holding the bare remotes.
    pub remotes_dir: PathBuf,
    /// The generated `repos.jsonc`.
    pub config_path: PathBuf,
    /// Names of the repos, in config order.
    pub repo_names: Vec<String>,
}

impl FleetFixture {
    /// Path to a working copy.
    pub fn repo_path(&self, name: &str) -> PathBuf {
        self.fleet_dir.join(name)
    }

    /// Path to the bare upstream remote of a repo.
    pub fn upstream_path(&self, name: &str) -> PathBuf {
        self.remotes_dir.join(format!("{}-upstream.git", name))
    }

    /// Path to the bare fork of a repo.
    pub fn mine_path(&self, name: &str) -> PathBuf {
        self.remotes_dir.join(format!("{}-mine.git", name))
    }

    pub fn upstream_url(&self, name: &str) -> String {
        git_helpers::file_url(&self.upstream_path(name))
    }

    pub fn mine_url(&self, name: &str) -> String {
        git_helpers::file_url(&self.mine_path(name))
    }

    /// Load the generated config the way the binary does.
    pub fn load(&self) -> RepoTable {
        Manifest::load(&self.config_path)
            .expect("fixture config should load")
            .resolve(self._temp.path())
            .expect("fixture config should resolve")
    }

    /// Context running the real `git`.
    pub fn context(&self) -> FleetContext {
        FleetContext::new(self.load(), Arc::new(GitCli::default()))
    }
}

enum Kind {
    /// Cloned from upstream, tracks it directly.
    Upstream,
    /// Cloned from a fork and on the use branch.
    Forked { upstream_alias: bool },
    /// Listed as standalone but not cloned yet.
    MissingStandalone,
}

struct RepoSpec {
    name: String,
    kind: Kind,
}

/// Builder for creating test fleets.
pub struct FleetBuilder {
    repos: Vec<RepoSpec>,
}

impl FleetBuilder {
    pub fn new() -> Self {
        Self { repos: Vec::new() }
    }

    /// A repo tracking upstream directly as `origin` on `main`.
    pub fn add_repo(mut self, name: &str) -> Self {
        self.repos.push(RepoSpec {
            name: name.to_string(),
            kind: Kind::Upstream,
        });
        self
    }

    /// A repo cloned from a personal fork, on the `mine` branch, with the
    /// upstream remote added as `upstream`.
    pub fn add_forked_repo(mut self, name: &str) -> Self {
        self.repos.push(RepoSpec {
            name: name.to_string(),
            kind: Kind::Forked {
                upstream_alias: true,
            },
        });
        self
    }

    /// Like [`add_forked_repo`](Self::add_forked_repo) but the working copy
    /// knows nothing of upstream yet.
    pub fn add_fork_without_upstream(mut self, name: &str) -> Self {
        self.repos.push(RepoSpec {
            name: name.to_string(),
            kind: Kind::Forked {
                upstream_alias: false,
            },
        });
        self
    }

    /// A standalone repo whose folder does not exist yet.
    pub fn add_missing_standalone(mut self, name: &str) -> Self {
        self.repos.push(RepoSpec {
            name: name.to_string(),
            kind: Kind::MissingStandalone,
        });
        self
    }

    /// Build the fleet fixture.
    pub fn build(self) -> FleetFixture {
        let temp = TempDir::new().expect("failed to create temp dir");
        let fleet_dir = temp.path().join("fleet");
        let remotes_dir = temp.path().join("remotes");
        fs::create_dir_all(&fleet_dir).unwrap();
        fs::create_dir_all(&remotes_dir).unwrap();

        let mut configs = Vec::new();
        let mut repo_names = Vec::new();

        for entry in &self.repos {
            let upstream = remotes_dir.join(format!("{}-upstream.git", entry.name));
            let upstream_url = git_helpers::file_url(&upstream);
            let repo_path = fleet_dir.join(&entry.name);
            let folder = repo_path.to_string_lossy().into_owned();

            create_upstream(temp.path(), &upstream, &entry.name);

            let config = match entry.kind {
                Kind::Upstream => {
                    git_helpers::clone_repo(&upstream_url, &repo_path);
                    RepoConfig::new(&folder, "main")
                        .name(&entry.name)
                        .remote("upstream", "origin", &upstream_url)
                }
                Kind::Forked { upstream_alias } => {
                    let mine = remotes_dir.join(format!("{}-mine.git", entry.name));
                    let mine_url = git_helpers::file_url(&mine);
                    git_helpers::clone_bare(&upstream_url, &mine);
                    git_helpers::branch_in_bare(&mine, USE_BRANCH, "main");

                    git_helpers::clone_repo(&mine_url, &repo_path);
                    git_helpers::checkout(&repo_path, USE_BRANCH);
                    if upstream_alias {
                        git_helpers::add_remote(&repo_path, "upstream", &upstream_url);
                        git_helpers::fetch(&repo_path, "upstream");
                    }

                    RepoConfig::new(&folder, "main")
                        .name(&entry.name)
                        .branch_use(USE_BRANCH)
                        .remote("mine", "origin", &mine_url)
                        .remote("upstream", "upstream", &upstream_url)
                        .remote_default("mine")
                }
                Kind::MissingStandalone => {
                    let folder = fleet_dir
                        .join("standalone")
                        .join(&entry.name)
                        .to_string_lossy()
                        .into_owned();
                    RepoConfig::new(&folder, "main")
                        .name(&entry.name)
                        .remote("upstream", "origin", &upstream_url)
                        .standalone()
                }
            };

            configs.push(config);
            repo_names.push(entry.name.clone());
        }

        let config_path = temp.path().join("repos.jsonc");
        write_config(&config_path, configs);

        FleetFixture {
            _temp: temp,
            fleet_dir,
            remotes_dir,
            config_path,
            repo_names,
        }
    }
}

/// Create a bare upstream with one commit on `main`.
fn create_upstream(root: &Path, bare: &Path, name: &str) {
    git_helpers::init_bare_repo(bare);

    let staging = root.join(format!("staging-{}", name));
    git_helpers::init_repo(&staging);
    git_helpers::commit_file(&staging, "README.md", &format!("# {}\n", name), "Add README.md");
    git_helpers::add_remote(&staging, "origin", &git_helpers::file_url(bare));
    git_helpers::push_upstream(&staging, "origin", "main");
    fs::remove_dir_all(&staging).unwrap();
}

/// Write the repository list as JSON with a leading comment.
fn write_config(path: &Path, repos: Vec<RepoConfig>) {
    let json = serde_json::to_string_pretty(&Manifest { repos }).unwrap();
    fs::write(path, format!("// generated by the test fixture\n{}\n", json)).unwrap();
}
