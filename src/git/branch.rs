//! Git branch queries

use std::fmt;
use std::path::Path;

use super::{CommandRunner, GitError};

/// What the working copy currently has checked out
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadRef {
    OnBranch(String),
    Detached,
}

impl HeadRef {
    /// Parse `git branch --show-current` output; empty means detached.
    pub fn parse(output: &str) -> Self {
        let name = output.trim_end_matches(['\n', '\r']);
        if name.is_empty() {
            HeadRef::Detached
        } else {
            HeadRef::OnBranch(name.to_string())
        }
    }

    /// True when on exactly `branch`. A detached HEAD matches nothing.
    pub fn is_branch(&self, branch: &str) -> bool {
        matches!(self, HeadRef::OnBranch(name) if name == branch)
    }
}

impl fmt::Display for HeadRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeadRef::OnBranch(name) => write!(f, "{}", name),
            HeadRef::Detached => write!(f, "(detached HEAD)"),
        }
    }
}

/// Get the current branch
pub fn current_branch(runner: &dyn CommandRunner, dir: &Path) -> Result<HeadRef, GitError> {
    let out = runner.run(dir, &["branch", "--show-current"])?;
    Ok(HeadRef::parse(&out.text))
}

/// Names of local branches (remote-tracking branches excluded)
pub fn local_branches(runner: &dyn CommandRunner, dir: &Path) -> Result<Vec<String>, GitError> {
    let out = runner.run(dir, &["branch"])?;
    Ok(parse_branch_list(&out.text))
}

/// Check if a local branch exists
pub fn has_local_branch(
    runner: &dyn CommandRunner,
    dir: &Path,
    branch: &str,
) -> Result<bool, GitError> {
    Ok(local_branches(runner, dir)?.iter().any(|b| b == branch))
}

/// Resolve a branch, tag or `HEAD` to a commit hash
pub fn rev_parse(runner: &dyn CommandRunner, dir: &Path, rev: &str) -> Result<String, GitError> {
    let out = runner.run(dir, &["rev-parse", rev])?;
    Ok(out.text.trim().to_string())
}

/// Strip the remote from a remote-tracking branch name.
///
/// `origin/km/reshelve-rewrite` becomes `km/reshelve-rewrite`. A name with no
/// `/` is returned unchanged.
pub fn remove_remote_from_branch_name(remote_branch: &str) -> &str {
    match remote_branch.split_once('/') {
        Some((_, branch)) => branch,
        None => remote_branch,
    }
}

fn parse_branch_list(output: &str) -> Vec<String> {
    output
        .lines()
        .map(|line| line.trim_matches(['\n', '\r', ' ', '*']))
        .filter(|line| !line.is_empty())
        .map(|line| line.to_string())
        .collect()
}
