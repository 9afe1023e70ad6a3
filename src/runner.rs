//! Process runner: launches one engine for one test case and captures what it wrote.
//!
//! ## EngineRunner Trait
//!
//! The harness talks to engines through the `EngineRunner` trait so that execution can be swapped
//! out (scripted runners in tests, remote execution later) without touching the harness loop.
//! `ProcessRunner` is the default implementation and spawns real child processes.
//!
//! ## Contract
//!
//! - The engine is invoked as `executable database query`: two positional arguments, no shell, no
//!   quoting or splitting of the query.
//! - Stdout and stderr are captured as raw bytes, untouched.
//! - A non-zero exit status is data, not an error. Only a failure to start the process (or to
//!   collect its output) is a `LaunchFailure`.
//! - Elapsed time is wall-clock on a monotonic clock, from just before spawn to just after exit.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::debug;

/// Everything one engine invocation produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Exit code, or `None` when the process was terminated by a signal.
    pub exit_status: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub elapsed: Duration,
}

impl ExecutionResult {
    /// Human-readable exit status (`0`, `1`, ..., or `signal`).
    pub fn status_label(&self) -> String {
        format_exit_status(self.exit_status)
    }
}

pub(crate) fn format_exit_status(status: Option<i32>) -> String {
    match status {
        Some(code) => code.to_string(),
        None => "signal".to_string(),
    }
}

/// An engine could not be started, or its output could not be collected.
#[derive(Debug, Error)]
pub enum LaunchFailure {
    #[error("executable '{executable}' not found")]
    NotFound { executable: String },

    #[error("executable '{executable}' could not be started: permission denied")]
    PermissionDenied { executable: String },

    #[error("failed to run '{executable}': {source}")]
    Io {
        executable: String,
        #[source]
        source: io::Error,
    },
}

impl LaunchFailure {
    fn from_io(executable: &str, source: io::Error) -> Self {
        let executable = executable.to_string();
        match source.kind() {
            io::ErrorKind::NotFound => LaunchFailure::NotFound { executable },
            io::ErrorKind::PermissionDenied => LaunchFailure::PermissionDenied { executable },
            _ => LaunchFailure::Io { executable, source },
        }
    }

    /// Copy of this failure; an I/O source is rebuilt from its kind and message.
    pub(crate) fn duplicate(&self) -> Self {
        match self {
            LaunchFailure::NotFound { executable } => LaunchFailure::NotFound {
                executable: executable.clone(),
            },
            LaunchFailure::PermissionDenied { executable } => LaunchFailure::PermissionDenied {
                executable: executable.clone(),
            },
            LaunchFailure::Io { executable, source } => LaunchFailure::Io {
                executable: executable.clone(),
                source: io::Error::new(source.kind(), source.to_string()),
            },
        }
    }

    pub fn executable(&self) -> &str {
        match self {
            LaunchFailure::NotFound { executable }
            | LaunchFailure::PermissionDenied { executable }
            | LaunchFailure::Io { executable, .. } => executable,
        }
    }
}

/// Which side of the comparison an invocation belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineRole {
    Reference,
    Engine,
}

impl EngineRole {
    pub fn as_str(self) -> &'static str {
        match self {
            EngineRole::Reference => "reference",
            EngineRole::Engine => "engine",
        }
    }

    /// Label used in report lines.
    pub fn description(self) -> &'static str {
        match self {
            EngineRole::Reference => "reference engine",
            EngineRole::Engine => "engine under test",
        }
    }
}

impl fmt::Display for EngineRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Run an engine executable against one test case.
pub trait EngineRunner {
    /// Block until `executable database query` terminates and return its captured output.
    fn run(&self, executable: &str, database: &str, query: &str) -> Result<ExecutionResult, LaunchFailure>;
}

/// Spawns engines as child processes (default behavior).
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    working_dir: Option<PathBuf>,
}

impl ProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run children in `dir` instead of the harness's own working directory.
    ///
    /// Database names are resolved by the engines, so this is where relative fixture names land.
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn working_dir(&self) -> Option<&Path> {
        self.working_dir.as_deref()
    }
}

impl EngineRunner for ProcessRunner {
    fn run(&self, executable: &str, database: &str, query: &str) -> Result<ExecutionResult, LaunchFailure> {
        let mut command = Command::new(executable);
        command
            .arg(database)
            .arg(query)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }

        let start = Instant::now();
        let output = command
            .output()
            .map_err(|source| LaunchFailure::from_io(executable, source))?;
        let elapsed = start.elapsed();

        debug!(
            executable,
            database,
            exit_status = ?output.status.code(),
            stdout_bytes = output.stdout.len(),
            stderr_bytes = output.stderr.len(),
            elapsed_ms = elapsed.as_secs_f64() * 1000.0,
            "engine finished"
        );

        Ok(ExecutionResult {
            exit_status: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
            elapsed,
        })
    }
}
