//! CLI module for enginediff
//!
//! ## Usage
//!
//! ```text
//! enginediff [--reference EXE] [--engine EXE] [--corpus FILE] [--workdir DIR]
//!            [-k EXPR] [-x] [--format console|json] [--no-color]
//! ```
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.
//!
//! Pass/fail is reported in the printed report, not the exit code: a completed run exits with 0
//! whatever its results. Only usage errors and an unreadable corpus exit non-zero.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};

use crate::config::{DEFAULT_ENGINE, DEFAULT_REFERENCE};
use crate::version::ENGINEDIFF_VERSION;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Report output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ReportFormat {
    /// Colored, one line per test case
    #[default]
    Console,
    /// One JSON object per line
    Json,
}

/// Compare a SQL engine's command-line output against a reference engine
#[derive(Parser, Debug)]
#[command(name = "enginediff")]
#[command(version = ENGINEDIFF_VERSION)]
#[command(about = "Compare a SQL engine's command-line output against a reference engine", long_about = None)]
pub struct Cli {
    /// Reference engine executable
    #[arg(long, value_name = "EXE", default_value = DEFAULT_REFERENCE)]
    pub reference: String,

    /// Engine under test
    #[arg(long, value_name = "EXE", default_value = DEFAULT_ENGINE)]
    pub engine: String,

    /// JSON corpus file (default: built-in corpus)
    #[arg(long, value_name = "FILE")]
    pub corpus: Option<PathBuf>,

    /// Working directory for both engines (where database files are looked up)
    #[arg(long, value_name = "DIR")]
    pub workdir: Option<PathBuf>,

    /// Only run cases whose database or query contains EXPR
    #[arg(short = 'k', value_name = "EXPR")]
    pub filter: Option<String>,

    /// Stop after the first case that does not pass
    #[arg(short = 'x', long = "exitfirst")]
    pub stop_on_fail: bool,

    /// Report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    pub format: ReportFormat,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
pub fn execute(cli: Cli) -> CliResult<ExitCode> {
    commands::run_conformance(&cli)
}

// ============================================================================
// Tests
// ============================================================================
