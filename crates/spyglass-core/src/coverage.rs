//! Coverage summaries and the report-to-percentage mapper.
//!
//! A coverage producer reports raw covered/total counters per file; this
//! module maps them to the percentage summaries the tree displays. The
//! [`CoverageSource`] trait is the seam for alternative producers; the
//! provided [`CoverageReport`] is a JSON-loadable map of per-file counters.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from loading a coverage report.
#[derive(Debug, Error)]
pub enum CoverageError {
    #[error("Failed to read coverage report: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse coverage report: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Branch/line/function/statement percentages for one file or a whole run.
///
/// Each field is in [0, 100]; `None` means the metric was not measured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CoverageSummary {
    pub branches: Option<f64>,
    pub lines: Option<f64>,
    pub functions: Option<f64>,
    pub statements: Option<f64>,
}

/// A covered/total pair for one metric.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Counter {
    pub covered: u64,
    pub total: u64,
}

impl Counter {
    /// Creates a counter.
    pub fn new(covered: u64, total: u64) -> Self {
        Self { covered, total }
    }

    /// Percentage in [0, 100], or `None` when nothing was measured.
    pub fn percentage(&self) -> Option<f64> {
        if self.total == 0 {
            return None;
        }
        Some(self.covered as f64 * 100.0 / self.total as f64)
    }

    fn add(&mut self, other: Counter) {
        self.covered += other.covered;
        self.total += other.total;
    }
}

/// Raw coverage counters for one file.
///
/// Metrics a producer does not report parse as zero counters, which map to
/// "not measured".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCoverage {
    pub branches: Counter,
    pub lines: Counter,
    pub functions: Counter,
    pub statements: Counter,
}

impl FileCoverage {
    /// Maps raw counters to summary percentages.
    pub fn to_summary(&self) -> CoverageSummary {
        CoverageSummary {
            branches: self.branches.percentage(),
            lines: self.lines.percentage(),
            functions: self.functions.percentage(),
            statements: self.statements.percentage(),
        }
    }

    fn add(&mut self, other: &FileCoverage) {
        self.branches.add(other.branches);
        self.lines.add(other.lines);
        self.functions.add(other.functions);
        self.statements.add(other.statements);
    }
}

/// Source of per-file and whole-run coverage summaries.
///
/// Implemented by whatever owns a coverage run's data; the store only ever
/// queries it, it never holds on to one.
pub trait CoverageSource {
    /// Summary for a single file, if the run measured it.
    fn file_summary(&self, path: &str) -> Option<CoverageSummary>;

    /// Whole-run summary, as reported by the producer.
    fn run_summary(&self) -> CoverageSummary;
}

/// A coverage report: per-file counters keyed by path.
///
/// Serializes as a plain JSON object mapping file paths to counter blocks,
/// e.g. `{"src/a.ts": {"lines": {"covered": 8, "total": 10}, ...}}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CoverageReport {
    files: HashMap<String, FileCoverage>,
}

impl CoverageReport {
    /// Creates an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records counters for a file, replacing any previous entry.
    pub fn insert(&mut self, path: impl Into<String>, coverage: FileCoverage) {
        self.files.insert(path.into(), coverage);
    }

    /// Parses a report from its JSON form.
    pub fn from_json_str(json: &str) -> Result<Self, CoverageError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a report from a JSON file on disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CoverageError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Number of files in the report.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// True when the report covers no files.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl CoverageSource for CoverageReport {
    fn file_summary(&self, path: &str) -> Option<CoverageSummary> {
        self.files.get(path).map(FileCoverage::to_summary)
    }

    /// The whole-run summary is computed from summed counters, not from
    /// averaging per-file percentages.
    fn run_summary(&self) -> CoverageSummary {
        let mut totals = FileCoverage::default();
        for coverage in self.files.values() {
            totals.add(coverage);
        }
        totals.to_summary()
    }
}
