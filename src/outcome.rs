//! Per-case outcomes and the run summary built from them.

use std::time::Duration;

use crate::compare::Divergence;
use crate::corpus::TestCase;
use crate::runner::{EngineRole, LaunchFailure};

/// Result of comparing the two engines on one test case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonOutcome {
    pub passed: bool,
    pub test_number: usize,
    pub case: TestCase,
    pub engine_elapsed: Duration,
    pub reference_elapsed: Duration,
    /// Exit-status and stderr differences; informational only.
    pub divergences: Vec<Divergence>,
}

/// What happened to one test case.
#[derive(Debug)]
pub enum CaseOutcome {
    Compared(ComparisonOutcome),
    /// One engine could not be started, so nothing was compared.
    CouldNotRun {
        test_number: usize,
        case: TestCase,
        role: EngineRole,
        failure: LaunchFailure,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseStatus {
    Passed,
    Failed,
    CouldNotRun,
}

impl CaseStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CaseStatus::Passed => "passed",
            CaseStatus::Failed => "failed",
            CaseStatus::CouldNotRun => "could_not_run",
        }
    }
}

impl CaseOutcome {
    pub fn test_number(&self) -> usize {
        match self {
            CaseOutcome::Compared(outcome) => outcome.test_number,
            CaseOutcome::CouldNotRun { test_number, .. } => *test_number,
        }
    }

    pub fn case(&self) -> &TestCase {
        match self {
            CaseOutcome::Compared(outcome) => &outcome.case,
            CaseOutcome::CouldNotRun { case, .. } => case,
        }
    }

    pub fn status(&self) -> CaseStatus {
        match self {
            CaseOutcome::Compared(outcome) if outcome.passed => CaseStatus::Passed,
            CaseOutcome::Compared(_) => CaseStatus::Failed,
            CaseOutcome::CouldNotRun { .. } => CaseStatus::CouldNotRun,
        }
    }

    pub fn passed(&self) -> bool {
        self.status() == CaseStatus::Passed
    }
}

/// Totals for a whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub could_not_run: usize,
    pub duration: Duration,
}

impl RunSummary {
    pub fn record(&mut self, outcome: &CaseOutcome) {
        self.total += 1;
        match outcome.status() {
            CaseStatus::Passed => self.passed += 1,
            CaseStatus::Failed => self.failed += 1,
            CaseStatus::CouldNotRun => self.could_not_run += 1,
        }
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0 && self.could_not_run == 0
    }
}
