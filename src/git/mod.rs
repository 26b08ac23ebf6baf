//! Git operations wrapper
//!
//! Every git interaction goes through a [`CommandRunner`], which shells out
//! to the `git` executable. The helpers in [`branch`] and [`remote`] are a
//! single invocation each plus parsing of the output.

pub mod branch;
pub mod remote;
pub mod runner;

#[cfg(test)]
pub(crate) mod fake;

pub use branch::*;
pub use remote::*;
pub use runner::{CmdOutput, CommandRunner, GitCli};

use std::fmt;
use thiserror::Error;

/// Errors that can occur during git operations
#[derive(Error, Debug)]
pub enum GitError {
    #[error("{command}: failed to start: {source}")]
    Spawn {
        command: CommandLine,
        #[source]
        source: std::io::Error,
    },

    #[error("{command}: {}: {}", exit_label(.code), .output.trim_end())]
    Failed {
        command: CommandLine,
        code: Option<i32>,
        output: String,
    },

    #[error("git executable not found: {0}")]
    NotFound(String),
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit status {}", code),
        None => "terminated by signal".to_string(),
    }
}

/// Program and arguments of one invocation, kept for reporting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine(Vec<String>);

impl CommandLine {
    pub fn new(program: &str, args: &[&str]) -> Self {
        let mut parts = Vec::with_capacity(args.len() + 1);
        parts.push(program.to_string());
        parts.extend(args.iter().map(|a| a.to_string()));
        Self(parts)
    }

    /// Arguments after the program name
    pub fn args(&self) -> &[String] {
        &self.0[1..]
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(" "))
    }
}
