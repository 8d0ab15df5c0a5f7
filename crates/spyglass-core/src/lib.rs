pub mod coverage;
pub mod node;
pub mod results;
pub mod search;
pub mod store;

pub use coverage::{CoverageError, CoverageReport, CoverageSource, CoverageSummary};
pub use node::{Assertion, NodeKind, SnapshotStatus, TestStatus, TreeIndex, TreeNode};
pub use results::{AssertionResult, FileResult, RunTotals};
pub use store::SuiteStore;
