//! Colored console output, one line per test case.

use std::io::{self, Stdout, Write};

use super::numbers::{format_significant, millis};
use super::{Reporter, TIMING_DIGITS};
use crate::outcome::{CaseOutcome, ComparisonOutcome, RunSummary};

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Human-readable reporter.
///
/// Passing cases print both timings; failing cases print the database and query needed to
/// reproduce them by hand, never the captured outputs.
pub struct ConsoleReporter<W: Write = Stdout> {
    out: W,
    reference_label: String,
    color: bool,
}

impl ConsoleReporter<Stdout> {
    pub fn stdout(reference_label: impl Into<String>, color: bool) -> Self {
        Self::new(io::stdout(), reference_label, color)
    }
}

impl<W: Write> ConsoleReporter<W> {
    /// `reference_label` names the reference engine in pass lines (e.g. `sqlite3`).
    pub fn new(out: W, reference_label: impl Into<String>, color: bool) -> Self {
        Self {
            out,
            reference_label: reference_label.into(),
            color,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn paint(&self, color: &str, text: &str) -> String {
        if self.color {
            format!("{color}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn compared_line(&self, outcome: &ComparisonOutcome) -> String {
        if outcome.passed {
            format!(
                "{}. Time taken: {}ms, {} time taken: {}ms",
                self.paint(GREEN, &format!("Test {} succeeded", outcome.test_number)),
                format_significant(millis(outcome.engine_elapsed), TIMING_DIGITS),
                self.reference_label,
                format_significant(millis(outcome.reference_elapsed), TIMING_DIGITS),
            )
        } else {
            format!(
                "{}. DB Name: {}, Query: {}",
                self.paint(RED, &format!("Test {} failed", outcome.test_number)),
                outcome.case.database,
                outcome.case.query,
            )
        }
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn on_run_start(&mut self, case_count: usize) {
        let _ = writeln!(self.out, "Running {case_count} tests");
    }

    fn report(&mut self, outcome: &CaseOutcome) {
        match outcome {
            CaseOutcome::Compared(compared) => {
                let line = self.compared_line(compared);
                let _ = writeln!(self.out, "{line}");
                for divergence in &compared.divergences {
                    let label = self.paint(YELLOW, "warning");
                    let _ = writeln!(self.out, "  {label}: {divergence}");
                }
            }
            CaseOutcome::CouldNotRun {
                test_number,
                case,
                role,
                failure,
            } => {
                let status = self.paint(RED, &format!("Test {test_number} could not run"));
                let _ = writeln!(
                    self.out,
                    "{status}. DB Name: {}, Query: {}, Reason: {}: {failure}",
                    case.database,
                    case.query,
                    role.description(),
                );
            }
        }
    }

    fn on_run_complete(&mut self, summary: &RunSummary) {
        let counts = if summary.total == 0 {
            "no tests ran".to_string()
        } else {
            format!(
                "{} passed, {} failed, {} could not run",
                summary.passed, summary.failed, summary.could_not_run
            )
        };

        let text = format!("{counts} in {:.2}s", summary.duration.as_secs_f64());
        let color = if summary.all_passed() {
            format!("{BOLD}{GREEN}")
        } else {
            format!("{BOLD}{RED}")
        };
        let line = self.paint(&color, &text);
        let _ = writeln!(self.out);
        let _ = writeln!(self.out, "{line}");
    }
}
