#![forbid(unsafe_code)]
//! enginediff: differential conformance testing for command-line SQL engines
//!
//! Runs a corpus of (database file, query) pairs through a trusted reference engine and through
//! the engine under test, compares the two standard outputs byte-for-byte, and reports pass/fail
//! with timings for every case.
//!
//! ## Pipeline
//!
//! - `corpus` - ordered test cases
//! - `runner` - launches one engine and captures its output
//! - `compare` - stdout equality plus non-fatal divergences
//! - `report` - console and JSON-lines reporters
//! - `harness` - the sequential loop tying them together
//!
//! ## Panic Policy
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module
//!   enforces `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.

pub mod cli;
pub mod compare;
pub mod config;
pub mod corpus;
pub mod harness;
pub mod outcome;
pub mod report;
pub mod runner;
pub mod version;

pub use compare::{Divergence, compare};
pub use config::HarnessConfig;
pub use corpus::{Corpus, CorpusError, TestCase};
pub use harness::Harness;
pub use outcome::{CaseOutcome, CaseStatus, ComparisonOutcome, RunSummary};
pub use report::{ConsoleReporter, JsonReporter, Reporter};
pub use runner::{EngineRole, EngineRunner, ExecutionResult, LaunchFailure, ProcessRunner};
