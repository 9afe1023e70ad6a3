//! Test corpus: the ordered list of (database, query) pairs both engines are run against.
//!
//! A corpus is an immutable value handed to the harness. Test numbers are 1-based positions in the
//! corpus and stay stable when a run is filtered, so "Test 5" always means the fifth entry.
//!
//! ## Sources
//!
//! - [`Corpus::builtin`] - the default cases against `companies.db` and `superheroes.db`
//! - [`Corpus::load`] - a JSON array of `{"database": ..., "query": ...}` objects

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One (database file, query string) pair.
///
/// Both fields are handed to the engines verbatim as positional arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    pub database: String,
    pub query: String,
}

impl TestCase {
    pub fn new(database: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            query: query.into(),
        }
    }

    /// True when the database name or the query contains `keyword`.
    pub fn matches(&self, keyword: &str) -> bool {
        self.database.contains(keyword) || self.query.contains(keyword)
    }
}

/// Errors raised while loading a corpus file.
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("failed to read corpus file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid corpus JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Read-only ordered sequence of test cases.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Corpus {
    cases: Vec<TestCase>,
}

const BUILTIN_CASES: &[(&str, &str)] = &[
    ("companies.db", ".tables"),
    ("companies.db", ".dbinfo"),
    ("companies.db", "SELECT id, name FROM companies WHERE country = 'north korea'"),
    ("superheroes.db", "SELECT id, name FROM superheroes WHERE hair_color = 'Gold Hair'"),
    ("companies.db", "SELECT id, name FROM companies WHERE country = 'chad'"),
    ("companies.db", "SELECT id, name FROM companies WHERE country = 'eritrea'"),
    ("companies.db", "SELECT id, name FROM companies WHERE country = 'chad'"),
    ("companies.db", "SELECT id, name FROM companies WHERE country = 'republic of the congo'"),
];

impl Corpus {
    pub fn new(cases: Vec<TestCase>) -> Self {
        Self { cases }
    }

    /// The default corpus. Duplicate entries are intentional: each one is its own numbered test.
    pub fn builtin() -> Self {
        Self::new(
            BUILTIN_CASES
                .iter()
                .map(|(database, query)| TestCase::new(*database, *query))
                .collect(),
        )
    }

    /// Parse a corpus from a JSON array of test cases.
    pub fn from_json_str(json: &str) -> Result<Self, CorpusError> {
        let cases: Vec<TestCase> = serde_json::from_str(json)?;
        Ok(Self::new(cases))
    }

    /// Load a corpus from a JSON file on disk.
    pub fn load(path: &Path) -> Result<Self, CorpusError> {
        let json = fs::read_to_string(path).map_err(|source| CorpusError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    pub fn cases(&self) -> &[TestCase] {
        &self.cases
    }

    /// Enumerate cases with their 1-based test numbers.
    pub fn iter_numbered(&self) -> impl Iterator<Item = (usize, &TestCase)> {
        self.cases.iter().enumerate().map(|(idx, case)| (idx + 1, case))
    }
}

impl FromIterator<TestCase> for Corpus {
    fn from_iter<I: IntoIterator<Item = TestCase>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
