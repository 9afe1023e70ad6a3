//! The comparison loop: run both engines on every case, compare, report.
//!
//! ## Ordering
//!
//! Cases run strictly one after another in corpus order. Within a case the reference engine runs to
//! completion before the engine under test starts, so neither timing is skewed by the other and any
//! side effect of the reference on the shared database file is visible to the engine under test.
//!
//! ## Failures
//!
//! A `LaunchFailure` ends that case only: it is reported as "could not run" and the loop moves on.
//! When the reference cannot be started, the engine under test is not invoked for that case.
//! Mismatched output is an ordinary failed outcome.

use std::time::Instant;

use tracing::{debug, info};

use crate::compare::{compare, divergences};
use crate::config::HarnessConfig;
use crate::corpus::{Corpus, TestCase};
use crate::outcome::{CaseOutcome, ComparisonOutcome, RunSummary};
use crate::report::Reporter;
use crate::runner::{EngineRole, EngineRunner, ExecutionResult, LaunchFailure, ProcessRunner};

/// Drives a corpus through two engines.
pub struct Harness<R: EngineRunner = ProcessRunner> {
    runner: R,
    config: HarnessConfig,
}

impl<R: EngineRunner> Harness<R> {
    pub fn new(runner: R, config: HarnessConfig) -> Self {
        Self { runner, config }
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Run every selected case of `corpus`, reporting each outcome as it completes.
    pub fn run(&self, corpus: &Corpus, reporter: &mut dyn Reporter) -> RunSummary {
        let start = Instant::now();
        let selected: Vec<(usize, &TestCase)> = corpus
            .iter_numbered()
            .filter(|(_, case)| self.config.filter.as_deref().is_none_or(|keyword| case.matches(keyword)))
            .collect();

        info!(
            reference = %self.config.reference,
            engine = %self.config.engine,
            selected = selected.len(),
            corpus = corpus.len(),
            "starting conformance run"
        );
        reporter.on_run_start(selected.len());

        let mut summary = RunSummary::default();
        for (test_number, case) in selected {
            let outcome = self.run_case(test_number, case);
            summary.record(&outcome);
            reporter.report(&outcome);

            if self.config.stop_on_fail && !outcome.passed() {
                info!(test_number, "stopping after first failure");
                break;
            }
        }

        summary.duration = start.elapsed();
        info!(
            passed = summary.passed,
            failed = summary.failed,
            could_not_run = summary.could_not_run,
            "conformance run complete"
        );
        reporter.on_run_complete(&summary);
        summary
    }

    /// Run one case: reference first, then the engine under test, then compare.
    pub fn run_case(&self, test_number: usize, case: &TestCase) -> CaseOutcome {
        let reference = match self.invoke(EngineRole::Reference, case) {
            Ok(result) => result,
            Err(failure) => return could_not_run(test_number, case, EngineRole::Reference, failure),
        };
        let engine = match self.invoke(EngineRole::Engine, case) {
            Ok(result) => result,
            Err(failure) => return could_not_run(test_number, case, EngineRole::Engine, failure),
        };

        let passed = compare(&reference, &engine);
        let divergences = divergences(&reference, &engine);
        for divergence in &divergences {
            debug!(test_number, database = %case.database, "{divergence}");
        }

        CaseOutcome::Compared(ComparisonOutcome {
            passed,
            test_number,
            case: case.clone(),
            engine_elapsed: engine.elapsed,
            reference_elapsed: reference.elapsed,
            divergences,
        })
    }

    fn invoke(&self, role: EngineRole, case: &TestCase) -> Result<ExecutionResult, LaunchFailure> {
        let executable = match role {
            EngineRole::Reference => &self.config.reference,
            EngineRole::Engine => &self.config.engine,
        };
        debug!(%role, executable = %executable, database = %case.database, query = %case.query, "launching");
        self.runner.run(executable, &case.database, &case.query)
    }
}

fn could_not_run(test_number: usize, case: &TestCase, role: EngineRole, failure: LaunchFailure) -> CaseOutcome {
    debug!(test_number, %role, error = %failure, "case could not run");
    CaseOutcome::CouldNotRun {
        test_number,
        case: case.clone(),
        role,
        failure,
    }
}
