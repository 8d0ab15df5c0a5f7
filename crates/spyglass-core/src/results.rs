//! Structured results delivered by the external test runner.
//!
//! These are input contracts only: the runner (or whatever parses its
//! output) produces them, the store consumes them. Nothing here is mutated
//! after construction.

use serde::{Deserialize, Serialize};

use crate::node::TestStatus;

/// Result for a single assertion (it block) inside one file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssertionResult {
    /// Test title, joined against [`Assertion::name`](crate::node::Assertion).
    pub title: String,
    /// Outcome of this assertion.
    pub status: TestStatus,
    /// Diagnostic message, may be empty.
    pub message: String,
}

impl AssertionResult {
    /// Creates an assertion result.
    pub fn new(title: impl Into<String>, status: TestStatus, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            status,
            message: message.into(),
        }
    }
}

/// Result for one test file in a completed run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileResult {
    /// File path, joined against the store's flat test index.
    pub path: String,
    /// Suite-level outcome.
    pub status: TestStatus,
    /// Suite-level message, may be empty.
    pub message: String,
    /// Per-assertion outcomes, in runner order.
    pub assertions: Vec<AssertionResult>,
}

impl FileResult {
    /// Creates a file result with no assertions.
    pub fn new(path: impl Into<String>, status: TestStatus, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            status,
            message: message.into(),
            assertions: Vec::new(),
        }
    }

    /// Adds assertion results.
    pub fn with_assertions(mut self, assertions: Vec<AssertionResult>) -> Self {
        self.assertions = assertions;
        self
    }
}

/// Aggregate counters for a whole run.
///
/// Replaced wholesale per update, never incrementally merged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunTotals {
    pub passed_suites: usize,
    pub failed_suites: usize,
    pub passed_tests: usize,
    pub failed_tests: usize,
    pub matched_snapshots: usize,
    pub unmatched_snapshots: usize,
}
