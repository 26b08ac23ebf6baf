//! Diff command implementation
//!
//! Compares a local branch against its remote-tracking counterpart and lists
//! the repositories that differ. The diff body itself is never reported.

use crate::cli::context::FleetContext;
use crate::cli::repo_iter::{fan_out, FanOutReport, OpError, RepoOutcome};
use crate::cli::report::ReportLabels;
use crate::core::repo::{RemoteSelector, RepoRecord};
use crate::git::{CmdOutput, CommandRunner};

use super::per_repo;

pub const LABELS: ReportLabels = ReportLabels {
    title: "Diffed",
    success_heading: "NEW upstream code",
};

/// Run the diff command
pub async fn run_diff(ctx: &FleetContext, selector: RemoteSelector) -> FanOutReport {
    fan_out(
        ctx.repos.clone(),
        per_repo(ctx, move |runner, repo| diff_repo(runner, repo, selector)),
    )
    .await
}

/// `git diff <branch> <alias>/<branch>` for one repository.
///
/// The branch comes from [`RepoRecord::compare_branch`], never from what is
/// currently checked out.
pub fn diff_repo(
    runner: &dyn CommandRunner,
    repo: &RepoRecord,
    selector: RemoteSelector,
) -> Result<RepoOutcome, OpError> {
    let remote = repo.remote_for(selector)?;
    let branch = repo.compare_branch(selector, remote);
    let tracking = remote.tracking_ref(branch);
    let out = runner.run(&repo.path, &["diff", branch, tracking.as_str()])?;
    Ok(classify_diff(&out))
}

/// Any output means the two refs differ. Only the command is kept.
pub fn classify_diff(out: &CmdOutput) -> RepoOutcome {
    if out.is_empty() {
        RepoOutcome::Skip
    } else {
        RepoOutcome::Success(out.command.to_string())
    }
}
