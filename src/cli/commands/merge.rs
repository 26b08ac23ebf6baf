//! Merge command implementation
//!
//! Merges my fork's copy of the use branch into the local use branch. The
//! branch is never switched here: a repo on any other branch fails so that
//! uncommitted work is left alone.

use crate::cli::context::FleetContext;
use crate::cli::repo_iter::{fan_out, FanOutReport, OpError, RepoOutcome};
use crate::cli::report::ReportLabels;
use crate::core::repo::RepoRecord;
use crate::git::{current_branch, CmdOutput, CommandRunner};

use super::per_repo;

pub const LABELS: ReportLabels = ReportLabels {
    title: "Merged",
    success_heading: "Repos merged",
};

/// Exact output of a merge with nothing to do
pub const ALREADY_UP_TO_DATE: &str = "Already up to date.\n";

/// Second-line prefixes of a merge that stopped partway
pub const MERGE_FAILURE_PREFIXES: [&str; 2] = ["error", "CONFLICT"];

/// Run the merge command
pub async fn run_merge_mine(ctx: &FleetContext) -> FanOutReport {
    fan_out(ctx.repos.clone(), per_repo(ctx, merge_mine_repo)).await
}

/// Merge `<mine>/<branch_use>` into one repository
pub fn merge_mine_repo(
    runner: &dyn CommandRunner,
    repo: &RepoRecord,
) -> Result<RepoOutcome, OpError> {
    let Ok(mine) = repo.mine() else {
        return Ok(RepoOutcome::Skip);
    };

    let head = current_branch(runner, &repo.path)?;
    if !head.is_branch(&repo.branch_use) {
        return Err(OpError::WrongBranch {
            expected: repo.branch_use.clone(),
            found: head,
        });
    }

    let tracking = mine.tracking_ref(&repo.branch_use);
    let out = runner.run(&repo.path, &["merge", tracking.as_str()])?;
    Ok(classify_merge(&out))
}

/// Classify the output of a merge that exited zero
pub fn classify_merge(out: &CmdOutput) -> RepoOutcome {
    if out.text == ALREADY_UP_TO_DATE {
        return RepoOutcome::Skip;
    }

    let stopped = out
        .text
        .lines()
        .nth(1)
        .is_some_and(|line| MERGE_FAILURE_PREFIXES.iter().any(|p| line.starts_with(p)));
    if stopped {
        RepoOutcome::Failure(out.text.clone())
    } else {
        RepoOutcome::Success(format!("{}\n{}", out.command, out.text))
    }
}
