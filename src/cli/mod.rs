//! CLI layer
//!
//! Fleet commands, the fan-out that runs them and report printing.

pub mod commands;
pub mod context;
pub mod output;
pub mod repo_iter;
pub mod report;

pub use context::FleetContext;
pub use output::Output;
pub use repo_iter::{fan_out, FanOutReport, OpError, RepoOutcome, ReportLine};
pub use report::{print_report, render_report, ReportLabels};
