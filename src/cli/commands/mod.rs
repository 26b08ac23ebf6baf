//! Fleet command implementations
//!
//! Each submodule holds one per-repository operation: a function of a runner
//! and a record, the classification of the git output it produces, and a
//! `run_*` entry point that fans the operation out over the whole table.

pub mod branch;
pub mod clone;
pub mod diff;
pub mod fetch;
pub mod merge;
pub mod remote;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use thiserror::Error;
use tracing::debug_span;

use crate::cli::context::FleetContext;
use crate::cli::output::Output;
use crate::cli::repo_iter::{FanOutReport, OpError, RepoOutcome};
use crate::cli::report::{print_report, ReportLabels};
use crate::core::repo::{RemoteSelector, RepoRecord};
use crate::git::CommandRunner;

/// A fleet-wide command selected on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FleetCommand {
    Fetch(RemoteSelector),
    Diff(RemoteSelector),
    MergeMine,
    SetUpstreamRemote,
    SwitchToUseBranch,
    Clone { shallow: bool },
    CreateLocalBranches,
}

/// Command names as typed on the command line, with a one-line description
pub const COMMANDS: &[(&str, FleetCommand, &str)] = &[
    (
        "fetchUpstream",
        FleetCommand::Fetch(RemoteSelector::Upstream),
        "git fetch the upstream remote",
    ),
    (
        "fetchDefault",
        FleetCommand::Fetch(RemoteSelector::Default),
        "git fetch the default remote",
    ),
    (
        "fetchMine",
        FleetCommand::Fetch(RemoteSelector::Mine),
        "git fetch my fork",
    ),
    (
        "mergeMine",
        FleetCommand::MergeMine,
        "merge my fork into the checked out use branch",
    ),
    (
        "diffUpstream",
        FleetCommand::Diff(RemoteSelector::Upstream),
        "list repos whose main branch differs from upstream",
    ),
    (
        "diffDefault",
        FleetCommand::Diff(RemoteSelector::Default),
        "list repos that differ from the default remote",
    ),
    (
        "diffMine",
        FleetCommand::Diff(RemoteSelector::Mine),
        "list repos whose use branch differs from my fork",
    ),
    (
        "init",
        FleetCommand::SetUpstreamRemote,
        "add the upstream remote where it is missing",
    ),
    (
        "init2",
        FleetCommand::SwitchToUseBranch,
        "check out the use branch and reset it to the default remote",
    ),
    (
        "init3",
        FleetCommand::Clone { shallow: false },
        "clone missing standalone repos",
    ),
    (
        "init3Shallow",
        FleetCommand::Clone { shallow: true },
        "clone missing standalone repos with --depth 1",
    ),
    (
        "init4",
        FleetCommand::CreateLocalBranches,
        "create local tracking branches for the main and use branches",
    ),
];

/// Name on the command line that is not a fleet command
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown command: {0}")]
pub struct UnknownCommand(pub String);

impl FromStr for FleetCommand {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        COMMANDS
            .iter()
            .find(|(name, _, _)| *name == s)
            .map(|(_, command, _)| *command)
            .ok_or_else(|| UnknownCommand(s.to_string()))
    }
}

impl fmt::Display for FleetCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = COMMANDS
            .iter()
            .find(|(_, command, _)| command == self)
            .map(|(name, _, _)| *name)
            .unwrap_or("unknown");
        write!(f, "{}", name)
    }
}

impl FleetCommand {
    /// Report wording for this command
    pub fn labels(&self) -> ReportLabels {
        match self {
            FleetCommand::Fetch(_) => fetch::LABELS,
            FleetCommand::Diff(_) => diff::LABELS,
            FleetCommand::MergeMine => merge::LABELS,
            FleetCommand::SetUpstreamRemote => remote::LABELS,
            FleetCommand::SwitchToUseBranch => branch::SWITCH_LABELS,
            FleetCommand::Clone { .. } => clone::LABELS,
            FleetCommand::CreateLocalBranches => branch::CREATE_LABELS,
        }
    }
}

/// The command list shown when no command (or an unknown one) is given
pub fn usage() -> String {
    let width = COMMANDS
        .iter()
        .map(|(name, _, _)| name.len())
        .max()
        .unwrap_or(0);
    let mut text = String::from("Commands:\n");
    for (name, _, about) in COMMANDS {
        text.push_str(&format!("  {:width$}  {}\n", name, about, width = width));
    }
    text
}

/// Run `command` over the whole fleet, print its report and return it.
pub async fn run_command(ctx: &FleetContext, command: FleetCommand) -> FanOutReport {
    let spinner = Output::spinner(&format!(
        "{} across {} repos...",
        command,
        ctx.repos().len()
    ));

    let report = match command {
        FleetCommand::Fetch(selector) => fetch::run_fetch(ctx, selector).await,
        FleetCommand::Diff(selector) => diff::run_diff(ctx, selector).await,
        FleetCommand::MergeMine => merge::run_merge_mine(ctx).await,
        FleetCommand::SetUpstreamRemote => remote::run_set_upstream(ctx).await,
        FleetCommand::SwitchToUseBranch => branch::run_switch_to_use_branch(ctx).await,
        FleetCommand::Clone { shallow } => clone::run_clone(ctx, shallow).await,
        FleetCommand::CreateLocalBranches => branch::run_create_local_branches(ctx).await,
    };

    spinner.finish_and_clear();
    print_report(&report, &command.labels());
    report
}

/// Bind a per-repo operation to the context's runner, producing the
/// `(index, table)` function the fan-out expects.
pub(crate) fn per_repo<F>(
    ctx: &FleetContext,
    op: F,
) -> impl Fn(usize, &[RepoRecord]) -> RepoOutcome + Send + Sync + 'static
where
    F: Fn(&dyn CommandRunner, &RepoRecord) -> Result<RepoOutcome, OpError>
        + Send
        + Sync
        + 'static,
{
    let runner = Arc::clone(&ctx.runner);
    move |index: usize, repos: &[RepoRecord]| {
        let repo = &repos[index];
        let _span = debug_span!("repo", index, name = %repo.name).entered();
        RepoOutcome::from_result(op(runner.as_ref(), repo))
    }
}
