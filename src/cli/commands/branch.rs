//! Branch setup commands
//!
//! `init2` puts every repository on its use branch and hard-resets it to the
//! default remote. `init4` creates local branches for the main and use
//! branches where only the remote-tracking branch exists.

use tracing::debug;

use crate::cli::context::FleetContext;
use crate::cli::repo_iter::{fan_out, FanOutReport, OpError, RepoOutcome};
use crate::cli::report::ReportLabels;
use crate::core::repo::RepoRecord;
use crate::git::{
    current_branch, has_local_branch, remove_remote_from_branch_name, rev_parse, CommandRunner,
    HeadRef,
};

use super::per_repo;

pub const SWITCH_LABELS: ReportLabels = ReportLabels {
    title: "Checked for use branch",
    success_heading: "Branch change actions",
};

pub const CREATE_LABELS: ReportLabels = ReportLabels {
    title: "Checked for local branches",
    success_heading: "Repos with local branches created",
};

/// Run the use-branch switch
pub async fn run_switch_to_use_branch(ctx: &FleetContext) -> FanOutReport {
    fan_out(ctx.repos.clone(), per_repo(ctx, switch_to_use_branch_repo)).await
}

/// Run local branch creation
pub async fn run_create_local_branches(ctx: &FleetContext) -> FanOutReport {
    fan_out(ctx.repos.clone(), per_repo(ctx, create_local_branches_repo)).await
}

/// Check out `branch_use` and make it match the default remote.
///
/// Up to two actions: a checkout (plain if the branch exists locally,
/// `--track` otherwise) and a `reset --hard` when the local and remote hashes
/// differ. Local commits on the use branch are discarded by the reset.
pub fn switch_to_use_branch_repo(
    runner: &dyn CommandRunner,
    repo: &RepoRecord,
) -> Result<RepoOutcome, OpError> {
    let dir = repo.path.as_path();
    let head = current_branch(runner, dir)?;
    let remote = repo.default_remote()?;
    let tracking = remote.tracking_ref(&repo.branch_use);

    let mut actions: Vec<String> = Vec::new();

    if !head.is_branch(&repo.branch_use) {
        let args: Vec<&str> = if has_local_branch(runner, dir, &repo.branch_use)? {
            vec!["checkout", repo.branch_use.as_str()]
        } else {
            vec!["checkout", "--track", tracking.as_str()]
        };
        let out = runner.run(dir, &args)?;
        actions.push(out.command.to_string());
    }

    let synced = (|| -> Result<bool, OpError> {
        let local = rev_parse(runner, dir, &repo.branch_use)?;
        let remote_hash = rev_parse(runner, dir, &tracking)?;
        Ok(local == remote_hash)
    })()
    .map_err(|e| e.after(&actions))?;

    if !synced {
        let out = runner
            .run(dir, &["reset", "--hard", tracking.as_str()])
            .map_err(|e| OpError::from(e).after(&actions))?;
        actions.push(out.command.to_string());
    }

    if actions.is_empty() {
        Ok(RepoOutcome::Skip)
    } else {
        Ok(RepoOutcome::Success(actions.join("\n")))
    }
}

/// Create local branches for `<default>/<branch_main>` and
/// `<default>/<branch_use>` where missing, then return to the starting branch.
///
/// `checkout --track` switches to the branch it creates, hence the restore.
/// A detached HEAD is left wherever the last checkout put it.
pub fn create_local_branches_repo(
    runner: &dyn CommandRunner,
    repo: &RepoRecord,
) -> Result<RepoOutcome, OpError> {
    let dir = repo.path.as_path();
    let start = current_branch(runner, dir)?;
    let remote = repo.default_remote()?;

    let mut remote_branches = vec![remote.tracking_ref(&repo.branch_main)];
    if repo.branch_use != repo.branch_main {
        remote_branches.push(remote.tracking_ref(&repo.branch_use));
    }

    let mut created: Vec<String> = Vec::new();
    for remote_branch in &remote_branches {
        let branch = remove_remote_from_branch_name(remote_branch);
        let exists = has_local_branch(runner, dir, branch).map_err(|e| {
            OpError::from(e).after(&created)
        })?;
        if exists {
            debug!(branch, "local branch exists");
            continue;
        }
        let out = runner
            .run(dir, &["checkout", "--track", remote_branch.as_str()])
            .map_err(|e| OpError::from(e).after(&created))?;
        created.push(format!("{}\n{}", out.command, out.text.trim_end()));
    }

    if created.is_empty() {
        return Ok(RepoOutcome::Skip);
    }

    if let HeadRef::OnBranch(name) = &start {
        runner
            .run(dir, &["checkout", name.as_str()])
            .map_err(|e| OpError::from(e).after(&created))?;
    }

    Ok(RepoOutcome::Success(created.join("\n")))
}
