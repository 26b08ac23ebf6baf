//! Git remote queries

use std::path::Path;

use super::{CommandRunner, GitError};

/// Aliases of the configured remotes, e.g. `origin`, `upstream`
pub fn remote_aliases(runner: &dyn CommandRunner, dir: &Path) -> Result<Vec<String>, GitError> {
    let out = runner.run(dir, &["remote"])?;
    Ok(out
        .text
        .lines()
        .map(str::trim)
        .filter(|alias| !alias.is_empty())
        .map(str::to_string)
        .collect())
}

/// Get the URL of a remote
pub fn remote_url(runner: &dyn CommandRunner, dir: &Path, alias: &str) -> Result<String, GitError> {
    let out = runner.run(dir, &["remote", "get-url", alias])?;
    Ok(out.text.trim_end_matches(['\n', '\r']).to_string())
}
