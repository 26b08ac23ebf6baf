//! Subprocess execution of git commands

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use super::{CommandLine, GitError};
use crate::util::log_cmd;

#[cfg(feature = "telemetry")]
use std::time::Instant;
#[cfg(feature = "telemetry")]
use tracing::{debug, instrument};

/// Captured result of a successful invocation
#[derive(Debug, Clone)]
pub struct CmdOutput {
    /// What was run
    pub command: CommandLine,
    /// stdout followed by stderr, lossily decoded
    pub text: String,
}

impl CmdOutput {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Runs one git command synchronously in a working directory.
///
/// A non-zero exit is returned as [`GitError::Failed`] carrying the captured
/// output. What the output means is left to the caller.
pub trait CommandRunner: Send + Sync {
    fn run(&self, dir: &Path, args: &[&str]) -> Result<CmdOutput, GitError>;
}

/// [`CommandRunner`] backed by the `git` executable
#[derive(Debug, Clone)]
pub struct GitCli {
    program: PathBuf,
    label: String,
}

impl GitCli {
    /// Use `program` as-is, without checking that it exists
    pub fn new(program: impl Into<PathBuf>) -> Self {
        let program = program.into();
        let label = program
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "git".to_string());
        Self { program, label }
    }

    /// Resolve `program` on `PATH` up front so a missing git fails at startup
    /// rather than once per repository.
    pub fn discover(program: &str) -> Result<Self, GitError> {
        let resolved = which::which(program)
            .map_err(|e| GitError::NotFound(format!("{}: {}", program, e)))?;
        let mut cli = Self::new(resolved);
        if let Some(stem) = Path::new(program).file_stem() {
            cli.label = stem.to_string_lossy().into_owned();
        }
        Ok(cli)
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new("git")
    }
}

impl CommandRunner for GitCli {
    #[cfg_attr(
        feature = "telemetry",
        instrument(level = "debug", skip(self, dir), fields(dir = %dir.display(), success = tracing::field::Empty))
    )]
    fn run(&self, dir: &Path, args: &[&str]) -> Result<CmdOutput, GitError> {
        let command = CommandLine::new(&self.label, args);

        #[cfg(feature = "telemetry")]
        let start = Instant::now();

        let mut cmd = Command::new(&self.program);
        cmd.args(args)
            .current_dir(dir)
            // Output is classified by message text, which must stay English.
            .env("LC_ALL", "C")
            // A credential prompt would block the task forever.
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null());
        log_cmd(&cmd);
        let output = cmd.output().map_err(|source| GitError::Spawn {
            command: command.clone(),
            source,
        })?;

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));
        let success = output.status.success();

        #[cfg(feature = "telemetry")]
        {
            let duration = start.elapsed();
            tracing::Span::current().record("success", success);
            debug!(
                %command,
                success,
                duration_ms = duration.as_millis() as u64,
                "git command complete"
            );
        }

        if !success {
            return Err(GitError::Failed {
                command,
                code: output.status.code(),
                output: text,
            });
        }

        Ok(CmdOutput { command, text })
    }
}
