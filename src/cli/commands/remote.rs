//! Upstream remote setup
//!
//! Adds the configured upstream remote to repositories that lack it. An
//! existing remote under the same alias is checked against the configured
//! URL and never rewritten.

use tracing::debug;

use crate::cli::context::FleetContext;
use crate::cli::repo_iter::{fan_out, FanOutReport, OpError, RepoOutcome};
use crate::cli::report::ReportLabels;
use crate::core::repo::RepoRecord;
use crate::git::{remote_aliases, remote_url, CmdOutput, CommandRunner};

use super::per_repo;

pub const LABELS: ReportLabels = ReportLabels {
    title: "Checked for upstream remote",
    success_heading: "NEW upstream remote set",
};

/// Prefix of `git remote add` output that signals a rejected remote
pub const REMOTE_ADD_ERROR_PREFIX: &str = "error";

/// Run the upstream remote setup
pub async fn run_set_upstream(ctx: &FleetContext) -> FanOutReport {
    fan_out(ctx.repos.clone(), per_repo(ctx, set_upstream_repo)).await
}

/// Add the upstream remote to one repository if it is missing
pub fn set_upstream_repo(
    runner: &dyn CommandRunner,
    repo: &RepoRecord,
) -> Result<RepoOutcome, OpError> {
    let upstream = repo.upstream()?;

    let aliases = remote_aliases(runner, &repo.path)?;
    if aliases.iter().any(|alias| alias == &upstream.alias) {
        let actual = remote_url(runner, &repo.path, &upstream.alias)?;
        if actual == upstream.url {
            debug!(alias = %upstream.alias, "upstream remote already set");
            return Ok(RepoOutcome::Skip);
        }
        return Err(OpError::UrlMismatch {
            config: upstream.url.clone(),
            actual,
        });
    }

    let out = runner.run(
        &repo.path,
        &["remote", "add", upstream.alias.as_str(), upstream.url.as_str()],
    )?;
    Ok(classify_remote_add(&out))
}

/// `git remote add` is normally silent
pub fn classify_remote_add(out: &CmdOutput) -> RepoOutcome {
    if out.text.starts_with(REMOTE_ADD_ERROR_PREFIX) {
        RepoOutcome::Failure(format!("{}\n{}", out.command, out.text))
    } else {
        RepoOutcome::Success(out.command.to_string())
    }
}
