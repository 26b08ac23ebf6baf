//! repofleet CLI entry point

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{CommandFactory, FromArgMatches, Parser};
use tracing::info;

use repofleet::cli::commands::{run_command, usage, FleetCommand};
use repofleet::cli::{FleetContext, Output};
use repofleet::git::GitCli;
use repofleet::telemetry::{init_telemetry, TelemetryConfig};
use repofleet::util::home_dir;
use repofleet::Manifest;

#[derive(Parser)]
#[command(name = "repofleet")]
#[command(author, version, about = "Fetch, diff, merge and clone a fleet of git repositories", long_about = None)]
struct Cli {
    /// Command to run across every configured repository
    command: Option<String>,

    /// Repository list (JSON with comments, or YAML)
    #[arg(short, long, env = "REPOFLEET_CONFIG", default_value = "repos.jsonc")]
    config: PathBuf,

    /// git executable to run
    #[arg(long, env = "REPOFLEET_GIT", default_value = "git")]
    git: String,

    /// Log every git invocation
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        Output::error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let matches = Cli::command().after_help(usage()).get_matches();
    let cli = Cli::from_arg_matches(&matches)?;

    let _telemetry = init_telemetry(&TelemetryConfig::for_cli(cli.verbose))?;

    let command = match cli.command.as_deref() {
        None => {
            print!("{}", usage());
            return Ok(());
        }
        Some(name) => match name.parse::<FleetCommand>() {
            Ok(command) => command,
            Err(e) => {
                Output::warning(&e.to_string());
                print!("{}", usage());
                return Ok(());
            }
        },
    };

    let manifest = Manifest::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    let home = home_dir().context("cannot determine the home directory")?;
    let repos = manifest
        .resolve(&home)
        .with_context(|| format!("invalid repository list {}", cli.config.display()))?;
    let git = GitCli::discover(&cli.git)?;

    info!(repos = repos.len(), %command, "starting");
    let ctx = FleetContext::new(repos, Arc::new(git));
    run_command(&ctx, command).await;

    Ok(())
}
