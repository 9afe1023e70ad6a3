//! Comparator: decides whether the engine under test matched the reference.
//!
//! Only standard output is part of the contract. It is compared byte-for-byte with no trimming,
//! newline normalization, or decoding, so `1|Acme` and `1|Acme\n` are different outputs.
//!
//! Exit status and stderr never affect pass/fail. Differences there are surfaced separately as
//! [`Divergence`] values, which the reporter shows as warnings.

use std::fmt;

use crate::runner::{ExecutionResult, format_exit_status};

/// True when both engines wrote exactly the same bytes to stdout.
pub fn compare(reference: &ExecutionResult, engine: &ExecutionResult) -> bool {
    reference.stdout == engine.stdout
}

/// A difference between the two invocations outside of stdout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Divergence {
    ExitStatus { reference: Option<i32>, engine: Option<i32> },
    Stderr { reference_len: usize, engine_len: usize },
}

impl fmt::Display for Divergence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Divergence::ExitStatus { reference, engine } => write!(
                f,
                "exit status differs (reference: {}, engine: {})",
                format_exit_status(*reference),
                format_exit_status(*engine)
            ),
            Divergence::Stderr {
                reference_len,
                engine_len,
            } => write!(
                f,
                "stderr differs (reference: {reference_len} bytes, engine: {engine_len} bytes)"
            ),
        }
    }
}

/// Collect exit-status and stderr differences. Never consulted for pass/fail.
pub fn divergences(reference: &ExecutionResult, engine: &ExecutionResult) -> Vec<Divergence> {
    let mut found = Vec::new();
    if reference.exit_status != engine.exit_status {
        found.push(Divergence::ExitStatus {
            reference: reference.exit_status,
            engine: engine.exit_status,
        });
    }
    if reference.stderr != engine.stderr {
        found.push(Divergence::Stderr {
            reference_len: reference.stderr.len(),
            engine_len: engine.stderr.len(),
        });
    }
    found
}
