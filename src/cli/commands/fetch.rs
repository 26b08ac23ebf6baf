//! Fetch command implementation
//!
//! Fetches one remote (upstream, mine or the configured default) in every
//! repository and reports which ones received new data.

use crate::cli::context::FleetContext;
use crate::cli::repo_iter::{fan_out, FanOutReport, OpError, RepoOutcome};
use crate::cli::report::ReportLabels;
use crate::core::repo::{RemoteSelector, RepoRecord};
use crate::git::{CmdOutput, CommandRunner};

use super::per_repo;

pub const LABELS: ReportLabels = ReportLabels {
    title: "Fetched",
    success_heading: "NEW repo data fetched",
};

/// Run the fetch command
pub async fn run_fetch(ctx: &FleetContext, selector: RemoteSelector) -> FanOutReport {
    fan_out(
        ctx.repos.clone(),
        per_repo(ctx, move |runner, repo| fetch_repo(runner, repo, selector)),
    )
    .await
}

/// Fetch the selected remote of one repository
pub fn fetch_repo(
    runner: &dyn CommandRunner,
    repo: &RepoRecord,
    selector: RemoteSelector,
) -> Result<RepoOutcome, OpError> {
    let remote = repo.remote_for(selector)?;
    let out = runner.run(&repo.path, &["fetch", remote.alias.as_str()])?;
    Ok(classify_fetch(&out))
}

/// `git fetch` is silent when the remote had nothing new.
pub fn classify_fetch(out: &CmdOutput) -> RepoOutcome {
    if out.is_empty() {
        RepoOutcome::Skip
    } else {
        RepoOutcome::Success(format!("{}\n{}", out.command, out.text))
    }
}
