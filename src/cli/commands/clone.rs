//! Clone command implementation
//!
//! Clones standalone repositories whose folder does not exist yet. A folder
//! that exists is taken to be the clone; nothing inside it is checked.

use std::fs;

use crate::cli::context::FleetContext;
use crate::cli::repo_iter::{fan_out, FanOutReport, OpError, RepoOutcome};
use crate::cli::report::ReportLabels;
use crate::core::repo::{RepoRecord, RepoTable};
use crate::git::CommandRunner;
use crate::util::parent_dir;

use super::per_repo;

pub const LABELS: ReportLabels = ReportLabels {
    title: "Checked for missing standalone repos",
    success_heading: "Clones performed",
};

/// Run the clone command
///
/// Only standalone repositories take part, so the report total counts those.
pub async fn run_clone(ctx: &FleetContext, shallow: bool) -> FanOutReport {
    fan_out(
        standalone_repos(ctx),
        per_repo(ctx, move |runner, repo| clone_repo(runner, repo, shallow)),
    )
    .await
}

fn standalone_repos(ctx: &FleetContext) -> RepoTable {
    ctx.repos().iter().filter(|r| r.standalone).cloned().collect()
}

/// Arguments for cloning `branch` of `url` into `dest`.
///
/// The shallow form still fetches the tip of every branch so that switching
/// branches later does not need an unshallow first.
pub fn clone_args(shallow: bool, branch: &str, url: &str, dest: &str) -> Vec<String> {
    let mut args = vec!["clone".to_string()];
    if shallow {
        args.extend(["--depth".to_string(), "1".to_string()]);
    }
    args.extend(["--branch".to_string(), branch.to_string()]);
    if shallow {
        args.push("--no-single-branch".to_string());
    }
    args.extend([url.to_string(), dest.to_string()]);
    args
}

/// Clone one standalone repository if its folder is missing
pub fn clone_repo(
    runner: &dyn CommandRunner,
    repo: &RepoRecord,
    shallow: bool,
) -> Result<RepoOutcome, OpError> {
    if !repo.standalone || repo.path.exists() {
        return Ok(RepoOutcome::Skip);
    }

    let remote = repo.default_remote()?;
    let parent = parent_dir(&repo.path);
    fs::create_dir_all(&parent).map_err(|source| OpError::Io {
        context: format!("failed to create {}", parent.display()),
        source,
    })?;

    // Relative to `parent`, where the clone runs.
    let dest = repo
        .path
        .file_name()
        .unwrap_or(repo.path.as_os_str())
        .to_string_lossy();
    let args = clone_args(shallow, &repo.branch_use, &remote.url, &dest);
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    let out = runner.run(&parent, &args)?;

    Ok(RepoOutcome::Success(format!("{}\n{}", out.command, out.text)))
}
