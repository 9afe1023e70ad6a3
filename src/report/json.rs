//! JSON-lines output for tooling.
//!
//! Each case becomes one object on its own line; the run ends with a `{"summary": {...}}` line.
//! Timings are plain milliseconds, not rounded.

use std::io::{self, Stdout, Write};

use serde::Serialize;

use super::Reporter;
use super::numbers::millis;
use crate::outcome::{CaseOutcome, RunSummary};

#[derive(Debug, Serialize)]
struct CaseRecord<'a> {
    test: usize,
    status: &'static str,
    database: &'a str,
    query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    engine_ms: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reference_ms: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    failed_engine: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    warnings: Vec<String>,
}

impl<'a> CaseRecord<'a> {
    fn from_outcome(outcome: &'a CaseOutcome) -> Self {
        let case = outcome.case();
        let mut record = CaseRecord {
            test: outcome.test_number(),
            status: outcome.status().as_str(),
            database: &case.database,
            query: &case.query,
            engine_ms: None,
            reference_ms: None,
            failed_engine: None,
            error: None,
            warnings: Vec::new(),
        };
        match outcome {
            CaseOutcome::Compared(compared) => {
                record.engine_ms = Some(millis(compared.engine_elapsed));
                record.reference_ms = Some(millis(compared.reference_elapsed));
                record.warnings = compared.divergences.iter().map(ToString::to_string).collect();
            }
            CaseOutcome::CouldNotRun { role, failure, .. } => {
                record.failed_engine = Some(role.as_str());
                record.error = Some(failure.to_string());
            }
        }
        record
    }
}

#[derive(Debug, Serialize)]
struct SummaryRecord {
    total: usize,
    passed: usize,
    failed: usize,
    could_not_run: usize,
    duration_ms: f64,
}

#[derive(Debug, Serialize)]
struct SummaryLine {
    summary: SummaryRecord,
}

/// Machine-readable reporter writing JSON lines.
pub struct JsonReporter<W: Write = Stdout> {
    out: W,
}

impl JsonReporter<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> JsonReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_line<T: Serialize>(&mut self, value: &T) {
        if serde_json::to_writer(&mut self.out, value).is_ok() {
            let _ = writeln!(self.out);
        }
    }
}

impl<W: Write> Reporter for JsonReporter<W> {
    fn report(&mut self, outcome: &CaseOutcome) {
        let record = CaseRecord::from_outcome(outcome);
        self.write_line(&record);
    }

    fn on_run_complete(&mut self, summary: &RunSummary) {
        let line = SummaryLine {
            summary: SummaryRecord {
                total: summary.total,
                passed: summary.passed,
                failed: summary.failed,
                could_not_run: summary.could_not_run,
                duration_ms: millis(summary.duration),
            },
        };
        self.write_line(&line);
    }
}
