//! Reporting of per-case outcomes
//!
//! ## Reporter Trait
//!
//! The harness hands every finished case to a `Reporter` and never prints anything itself. This
//! keeps output format separate from execution: `ConsoleReporter` writes colored human-readable
//! lines, `JsonReporter` writes one JSON object per line for tooling.
//!
//! Reporters are write-only. A failing write (closed pipe, full disk) is ignored so that it cannot
//! interrupt the run.

pub mod console;
pub mod json;
pub mod numbers;

pub use console::ConsoleReporter;
pub use json::JsonReporter;
pub use numbers::format_significant;

use crate::outcome::{CaseOutcome, RunSummary};

/// Significant digits used for timings in report lines.
pub const TIMING_DIGITS: usize = 4;

/// Receives outcomes from the harness, in corpus order.
pub trait Reporter {
    /// Called once before the first case runs, with the number of cases selected.
    fn on_run_start(&mut self, _case_count: usize) {}

    /// Called after each case completes.
    fn report(&mut self, outcome: &CaseOutcome);

    /// Called once after the last case.
    fn on_run_complete(&mut self, _summary: &RunSummary) {}
}

/// Reporter that keeps outcomes in memory.
///
/// For embedding the harness in other tools and for tests that inspect outcomes instead of
/// rendered text.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    pub case_count: Option<usize>,
    pub outcomes: Vec<CaseOutcome>,
    pub summary: Option<RunSummary>,
}

impl Reporter for CollectingReporter {
    fn on_run_start(&mut self, case_count: usize) {
        self.case_count = Some(case_count);
    }

    fn report(&mut self, outcome: &CaseOutcome) {
        self.outcomes.push(clone_outcome(outcome));
    }

    fn on_run_complete(&mut self, summary: &RunSummary) {
        self.summary = Some(summary.clone());
    }
}

// `LaunchFailure` wraps `io::Error`, which is not `Clone`; the message is all a collector needs.
fn clone_outcome(outcome: &CaseOutcome) -> CaseOutcome {
    match outcome {
        CaseOutcome::Compared(compared) => CaseOutcome::Compared(compared.clone()),
        CaseOutcome::CouldNotRun {
            test_number,
            case,
            role,
            failure,
        } => CaseOutcome::CouldNotRun {
            test_number: *test_number,
            case: case.clone(),
            role: *role,
            failure: failure.duplicate(),
        },
    }
}
