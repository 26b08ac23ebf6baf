//! Scripted [`CommandRunner`] for unit tests

use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::sync::Mutex;

use super::{CmdOutput, CommandLine, CommandRunner, GitError};

/// Answers commands from a table keyed by the space-joined arguments and
/// records every call. Unscripted commands fail with exit status 128.
///
/// Scripting the same command more than once queues the answers; the last
/// one is repeated once the queue runs down.
#[derive(Default)]
pub(crate) struct FakeRunner {
    responses: Mutex<HashMap<String, VecDeque<Result<String, String>>>>,
    calls: Mutex<Vec<String>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a successful command
    pub fn ok(self, args: &str, output: &str) -> Self {
        self.script(args, Ok(output.to_string()))
    }

    /// Script a command exiting non-zero
    pub fn fail(self, args: &str, output: &str) -> Self {
        self.script(args, Err(output.to_string()))
    }

    fn script(self, args: &str, response: Result<String, String>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .entry(args.to_string())
            .or_default()
            .push_back(response);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of calls whose arguments start with `prefix`
    pub fn count(&self, prefix: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }
}

impl CommandRunner for FakeRunner {
    fn run(&self, _dir: &Path, args: &[&str]) -> Result<CmdOutput, GitError> {
        let key = args.join(" ");
        self.calls.lock().unwrap().push(key.clone());
        let command = CommandLine::new("git", args);

        let response = {
            let mut responses = self.responses.lock().unwrap();
            responses.get_mut(&key).and_then(|queue| {
                if queue.len() > 1 {
                    queue.pop_front()
                } else {
                    queue.front().cloned()
                }
            })
        };

        match response {
            Some(Ok(text)) => Ok(CmdOutput { command, text }),
            Some(Err(output)) => Err(GitError::Failed {
                command,
                code: Some(1),
                output,
            }),
            None => Err(GitError::Failed {
                command,
                code: Some(128),
                output: format!("no scripted response for `{}`", key),
            }),
        }
    }
}
