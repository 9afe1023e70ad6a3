//! Harness configuration
//!
//! Which executables are compared and which cases of the corpus are run. The corpus itself is not
//! part of the configuration; it is passed to each run separately.

use std::path::Path;

/// Default reference engine (SQLite's command-line shell).
pub const DEFAULT_REFERENCE: &str = "sqlite3";
/// Default engine under test.
pub const DEFAULT_ENGINE: &str = "sql";

/// Harness configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    /// Reference engine executable, resolved through the normal executable lookup
    pub reference: String,
    /// Engine under test executable
    pub engine: String,
    /// Only run cases whose database or query contains this substring
    pub filter: Option<String>,
    /// Stop after the first case that does not pass
    pub stop_on_fail: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            reference: DEFAULT_REFERENCE.to_string(),
            engine: DEFAULT_ENGINE.to_string(),
            filter: None,
            stop_on_fail: false,
        }
    }
}

impl HarnessConfig {
    /// Create a new config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the reference engine executable
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = reference.into();
        self
    }

    /// Set the engine under test
    pub fn with_engine(mut self, engine: impl Into<String>) -> Self {
        self.engine = engine.into();
        self
    }

    /// Restrict the run to matching cases
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn with_stop_on_fail(mut self, stop_on_fail: bool) -> Self {
        self.stop_on_fail = stop_on_fail;
        self
    }

    /// Short name of the reference engine for report lines: `/usr/bin/sqlite3.exe` -> `sqlite3`.
    pub fn reference_label(&self) -> String {
        Path::new(&self.reference)
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.reference.clone())
    }
}
