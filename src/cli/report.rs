//! Summary printing for a finished fan-out

use std::fmt::Write as _;
use std::time::Duration;

use colored::Colorize;

use super::output::Output;
use super::repo_iter::{FanOutReport, ReportLine};

/// Wording of a report, per command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportLabels {
    /// First line, e.g. `Fetched`
    pub title: &'static str,
    /// Heading over the success list, e.g. `NEW repo data fetched`
    pub success_heading: &'static str,
}

const FAILURE_HEADING: &str = "FAILURES";

/// Render a report. Both lists are sorted by index, so the text does not
/// depend on the order tasks finished in.
pub fn render_report(report: &FanOutReport, labels: &ReportLabels) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{}: {} succeeded of {}, elapsed {}",
        labels.title.bold(),
        report.ok_count(),
        report.total,
        format_elapsed(report.elapsed)
    );

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{}: {}",
        labels.success_heading.green().bold(),
        report.succeeded.len()
    );
    write_lines(&mut out, &report.succeeded);

    let _ = writeln!(out);
    let heading = if report.has_failures() {
        FAILURE_HEADING.red().bold()
    } else {
        FAILURE_HEADING.normal()
    };
    let _ = writeln!(out, "{}: {}", heading, report.failed.len());
    write_lines(&mut out, &report.failed);

    out
}

/// Print a report to stdout
pub fn print_report(report: &FanOutReport, labels: &ReportLabels) {
    print!("{}", render_report(report, labels));
}

fn write_lines(out: &mut String, lines: &[ReportLine]) {
    let mut sorted: Vec<&ReportLine> = lines.iter().collect();
    sorted.sort_by_key(|line| line.index);
    for line in sorted {
        let _ = writeln!(
            out,
            "{}: {} {}",
            line.index,
            Output::folder(&line.folder),
            line.message.trim_end()
        );
    }
}

fn format_elapsed(elapsed: Duration) -> String {
    if elapsed.as_secs() >= 60 {
        format!("{}m{:02}s", elapsed.as_secs() / 60, elapsed.as_secs() % 60)
    } else {
        format!("{:.2}s", elapsed.as_secs_f64())
    }
}
