//! Fan-out over the repository table
//!
//! Every fleet command has the same shape: run one operation per repository,
//! all at once, collect what each one reported, wait for the last one, then
//! print a summary. This module owns that shape.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{debug, error};

use crate::core::repo::{RepoError, RepoRecord, RepoTable};
use crate::git::{GitError, HeadRef};

/// Result of running an operation on a single repo
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoOutcome {
    /// Nothing to do; not reported
    Skip,
    /// Something happened; goes in the success list
    Success(String),
    /// Goes in the failure list
    Failure(String),
}

impl RepoOutcome {
    /// Collapse an operation result, turning the error into a failure entry
    pub fn from_result(result: Result<RepoOutcome, OpError>) -> Self {
        result.unwrap_or_else(|e| RepoOutcome::Failure(e.to_string()))
    }
}

/// Why a per-repo operation failed. Never fatal to the run.
#[derive(Error, Debug)]
pub enum OpError {
    #[error(transparent)]
    Repo(#[from] RepoError),

    #[error(transparent)]
    Git(#[from] GitError),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{expected} must be checked out before merging from my remote (currently {found})")]
    WrongBranch { expected: String, found: HeadRef },

    #[error("mismatched upstream URL.\nconfig: {config}\nactual: {actual}")]
    UrlMismatch { config: String, actual: String },

    #[error("{source}\nalready done:\n{done}")]
    Partial {
        done: String,
        #[source]
        source: Box<OpError>,
    },
}

impl OpError {
    /// Attach the actions that completed before this error
    pub fn after(self, done: &[String]) -> Self {
        if done.is_empty() {
            self
        } else {
            OpError::Partial {
                done: done.join("\n"),
                source: Box::new(self),
            }
        }
    }
}

/// One entry of a success or failure list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLine {
    /// Position of the repository in the full table
    pub index: usize,
    pub folder: String,
    pub message: String,
}

/// Everything a fan-out produced
#[derive(Debug, Clone)]
pub struct FanOutReport {
    /// Success entries, in completion order
    pub succeeded: Vec<ReportLine>,
    /// Failure entries, in completion order
    pub failed: Vec<ReportLine>,
    /// Repos that had nothing to do
    pub skipped: usize,
    /// Number of repos the operation ran on
    pub total: usize,
    /// Wall-clock time from first spawn to last completion
    pub elapsed: Duration,
}

impl FanOutReport {
    /// Repos that did not fail, skips included
    pub fn ok_count(&self) -> usize {
        self.total - self.failed.len()
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Run `op` once per repository, concurrently, and gather the outcomes.
///
/// One blocking task is spawned per index with no upper bound. Successes and
/// failures go to separate lists, each behind its own lock, which is held only
/// for the push. A panicking operation is recorded as a failure for its repo
/// and does not disturb the others. Returns once every task has finished.
pub async fn fan_out<F>(repos: RepoTable, op: F) -> FanOutReport
where
    F: Fn(usize, &[RepoRecord]) -> RepoOutcome + Send + Sync + 'static,
{
    let start = Instant::now();
    let total = repos.len();
    let op = Arc::new(op);

    let succeeded: Arc<Mutex<Vec<ReportLine>>> = Arc::new(Mutex::new(Vec::with_capacity(total)));
    let failed: Arc<Mutex<Vec<ReportLine>>> = Arc::new(Mutex::new(Vec::new()));
    let skipped = Arc::new(AtomicUsize::new(0));

    let mut join_set: JoinSet<()> = JoinSet::new();

    for index in 0..total {
        let repos = Arc::clone(&repos);
        let op = Arc::clone(&op);
        let succeeded = Arc::clone(&succeeded);
        let failed = Arc::clone(&failed);
        let skipped = Arc::clone(&skipped);

        join_set.spawn_blocking(move || {
            let outcome = catch_unwind(AssertUnwindSafe(|| op(index, &repos))).unwrap_or_else(
                |panic| {
                    RepoOutcome::Failure(format!("operation panicked: {}", panic_message(&panic)))
                },
            );

            let line = |message: String| ReportLine {
                index: repos[index].index,
                folder: repos[index].folder.clone(),
                message,
            };
            match outcome {
                RepoOutcome::Skip => {
                    debug!(index, "skipped");
                    skipped.fetch_add(1, Ordering::Relaxed);
                }
                RepoOutcome::Success(message) => {
                    debug!(index, "succeeded");
                    let entry = line(message);
                    lock(&succeeded).push(entry);
                }
                RepoOutcome::Failure(message) => {
                    debug!(index, "failed");
                    let entry = line(message);
                    lock(&failed).push(entry);
                }
            }
        });
    }

    while let Some(res) = join_set.join_next().await {
        if let Err(e) = res {
            error!(error = %e, "fan-out task did not complete");
        }
    }

    FanOutReport {
        succeeded: into_lines(succeeded),
        failed: into_lines(failed),
        skipped: skipped.load(Ordering::Relaxed),
        total,
        elapsed: start.elapsed(),
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn into_lines(list: Arc<Mutex<Vec<ReportLine>>>) -> Vec<ReportLine> {
    match Arc::try_unwrap(list) {
        Ok(mutex) => mutex.into_inner().unwrap_or_else(PoisonError::into_inner),
        Err(arc) => lock(&arc).clone(),
    }
}

fn panic_message(panic: &Box<dyn Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
