//! Tree entities for the suite tree: directories, files, and their test cases.

use serde::{Deserialize, Serialize};

use crate::coverage::CoverageSummary;

/// Substring a test runner puts in assertion messages when a stored
/// snapshot no longer matches the received value.
pub const SNAPSHOT_MISMATCH_MARKER: &str = "stored snapshot";

/// Reconciliation status of a file or a single assertion.
///
/// `Unknown` doubles as the initial state and the post-reset state; the two
/// are indistinguishable by design.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestStatus {
    /// Never run, or reset since the last run.
    #[default]
    Unknown,
    /// Last run passed.
    Passed,
    /// Last run failed.
    Failed,
    /// Skipped in the last run.
    Skipped,
}

impl TestStatus {
    /// Returns a short label for display next to a node.
    pub fn display_name(&self) -> &'static str {
        match self {
            TestStatus::Unknown => "unknown",
            TestStatus::Passed => "passed",
            TestStatus::Failed => "failed",
            TestStatus::Skipped => "skipped",
        }
    }
}

/// Snapshot mismatch classification derived from an assertion message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotStatus {
    /// No snapshot mismatch detected.
    #[default]
    Unknown,
    /// The message indicates a stored-snapshot mismatch.
    Error,
}

impl SnapshotStatus {
    /// Classifies an assertion message by the stored-snapshot marker.
    pub fn from_message(message: &str) -> Self {
        if message.contains(SNAPSHOT_MISMATCH_MARKER) {
            SnapshotStatus::Error
        } else {
            SnapshotStatus::Unknown
        }
    }
}

/// Structural kind of a tree node.
///
/// Directories exist only to shape the tree; run results and coverage attach
/// to `File` nodes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// A directory grouping other nodes.
    Directory,
    /// A source or test file.
    #[default]
    File,
}

/// One test case (it block) owned by a file node.
///
/// Identity within a file is by `name`; incoming results are joined against
/// it by exact title equality.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Assertion {
    /// Test title, the join key against incoming results.
    pub name: String,
    /// Status from the last reconciled run.
    pub status: TestStatus,
    /// Diagnostic text from the last run.
    pub assertion_message: String,
    /// True while a dispatched run has not reported back.
    pub is_executing: bool,
    /// Snapshot mismatch classification for the last message.
    pub snapshot_status: SnapshotStatus,
}

impl Assertion {
    /// Creates an assertion with the given title and no run state.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// A node in the suite tree: a directory, a source file, or a test file.
///
/// Nodes are arena records keyed by `path`; tree structure is carried by
/// `children` (child paths) and by the display forests, never by owned child
/// nodes. All run/coverage state on a node is mutated exclusively by the
/// [`SuiteStore`](crate::store::SuiteStore).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    /// Unique identifier, stable across updates.
    pub path: String,
    /// Display name, derived from the path.
    pub label: String,
    /// Secondary display string (status or coverage), derived.
    pub secondary_label: String,
    /// Structural kind.
    pub kind: NodeKind,
    /// True for test files; test files never receive coverage.
    pub is_test: bool,
    /// Suite-level status from the last reconciled run.
    pub status: TestStatus,
    /// Suite-level message from the last run, replaced wholesale.
    pub output: String,
    /// Test cases owned by this file, in declaration order.
    pub it_blocks: Vec<Assertion>,
    /// Coverage percentages, meaningful for non-test files only.
    pub coverage: CoverageSummary,
    /// Transient selection flag.
    pub is_selected: bool,
    /// Spin state: true while a dispatched run is in flight.
    pub is_executing: bool,
    /// Paths of child nodes, in display order.
    pub children: Vec<String>,
}

impl TreeNode {
    /// Creates a node with a label derived from the path's file name.
    pub fn new(path: impl Into<String>, kind: NodeKind) -> Self {
        let path = path.into();
        let label = std::path::Path::new(&path)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("")
            .to_string();

        Self {
            path,
            label,
            kind,
            ..Self::default()
        }
    }

    /// Creates a directory node.
    pub fn directory(path: impl Into<String>) -> Self {
        Self::new(path, NodeKind::Directory)
    }

    /// Creates a plain file node.
    pub fn file(path: impl Into<String>) -> Self {
        Self::new(path, NodeKind::File)
    }

    /// Creates a test file node.
    pub fn test_file(path: impl Into<String>) -> Self {
        let mut node = Self::new(path, NodeKind::File);
        node.is_test = true;
        node
    }

    /// Sets the child paths.
    pub fn with_children(mut self, children: Vec<String>) -> Self {
        self.children = children;
        self
    }

    /// Sets the owned test cases.
    pub fn with_it_blocks(mut self, it_blocks: Vec<Assertion>) -> Self {
        self.it_blocks = it_blocks;
        self
    }

    /// Clears the spin state back to the plain file icon.
    pub fn set_file_icon(&mut self) {
        self.is_executing = false;
    }

    /// Marks the node as running (spinner in the tree view).
    pub fn spin(&mut self) {
        self.is_executing = true;
    }
}

/// Display structure for one view: a tree of node paths.
///
/// The node records themselves live in the store's flat index; forests hold
/// only these key trees, so replacing a view wholesale never touches node
/// state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeIndex {
    /// Path of the node this entry refers to.
    pub path: String,
    /// Child entries, in display order.
    pub children: Vec<TreeIndex>,
}

impl TreeIndex {
    /// Creates an entry with no children.
    pub fn leaf(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            children: Vec::new(),
        }
    }

    /// Creates an entry with the given children.
    pub fn branch(path: impl Into<String>, children: Vec<TreeIndex>) -> Self {
        Self {
            path: path.into(),
            children,
        }
    }
}
