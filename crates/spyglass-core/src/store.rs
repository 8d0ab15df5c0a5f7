//! The suite store: canonical forests, flat indices, and reconciliation.
//!
//! [`SuiteStore`] owns two display forests (test tree and file/coverage
//! tree) and two flat path-keyed indices holding the node records (the
//! arena). Reconciliation operations merge externally produced run results
//! and coverage reports into the node records by path/title identity; query
//! operations derive filtered views without mutating anything.
//!
//! The store is single-writer and fully synchronous: one driver calls one
//! operation at a time, and every operation runs to completion. Repeated or
//! stale deliveries are tolerated by the reset-then-merge protocol rather
//! than by locking. Subscribers watch [`SuiteStore::revision`], which is
//! bumped exactly once per top-level mutation.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use tracing::debug;

use crate::coverage::{CoverageSource, CoverageSummary};
use crate::node::{Assertion, NodeKind, SnapshotStatus, TestStatus, TreeIndex, TreeNode};
use crate::results::{FileResult, RunTotals};
use crate::search::{build_root, filter_by_text, filter_by_text_where, filter_tree};

/// Owns the canonical suite trees and reconciles external results into them.
#[derive(Debug, Default)]
pub struct SuiteStore {
    /// File/coverage forest, in display order.
    files: Vec<TreeIndex>,
    /// Test forest, in display order.
    tests: Vec<TreeIndex>,
    /// Flat index for the test tree: path → node record.
    nodes: IndexMap<String, TreeNode>,
    /// Flat index for the file/coverage tree.
    coverage_nodes: IndexMap<String, TreeNode>,
    /// Current search query.
    search_text: String,
    /// Aggregate counters for the last run.
    totals: RunTotals,
    /// Whole-run coverage summary, as reported.
    total_coverage: CoverageSummary,
    /// When run results were last merged.
    last_run_at: Option<DateTime<Utc>>,
    /// Mutation counter for subscribers.
    revision: u64,
}

impl SuiteStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the test forest and its flat index wholesale.
    ///
    /// The forest is pruned of empty directories before install; the flat
    /// index keeps every supplied node regardless of pruning, so results for
    /// pruned-from-display files still reconcile.
    pub fn initialize(&mut self, tests: Vec<TreeIndex>, nodes: IndexMap<String, TreeNode>) {
        self.nodes = nodes;
        let root = build_root(tests);
        self.tests = filter_tree(&root, &self.nodes).children;
        self.touch();
    }

    /// Replaces the file forest and its flat index wholesale.
    pub fn initialize_coverage_files(
        &mut self,
        files: Vec<TreeIndex>,
        nodes: IndexMap<String, TreeNode>,
    ) {
        self.files = files;
        self.coverage_nodes = nodes;
        self.touch();
    }

    /// Looks up a node in the test index first, then the coverage index.
    ///
    /// The same physical file may appear once in each view, and callers
    /// rarely know which view produced a given path.
    pub fn node_by_path(&self, path: &str) -> Option<&TreeNode> {
        self.nodes.get(path).or_else(|| self.coverage_nodes.get(path))
    }

    /// Merges a completed run into the tree by path/title identity.
    ///
    /// All nodes are reset first, so statuses from a prior run never linger
    /// on files absent from this result set; applying the same results twice
    /// therefore yields the same node states as applying them once.
    ///
    /// Results for unknown paths, and assertion results for unknown titles,
    /// are dropped silently: the tree is the source of truth for what is
    /// known, and mismatches are expected timing skew rather than errors.
    /// When a file declares duplicate titles, only the first match is
    /// updated.
    pub fn apply_run_results(&mut self, results: &[FileResult]) {
        self.reset_all();

        for result in results {
            let Some(node) = self.nodes.get_mut(&result.path) else {
                debug!(path = %result.path, "dropping result for unknown file");
                continue;
            };

            node.set_file_icon();
            node.status = result.status;
            node.output = result.message.clone();
            node.secondary_label = result.status.display_name().to_string();

            for assertion in &result.assertions {
                let Some(it_block) = node
                    .it_blocks
                    .iter_mut()
                    .find(|it| it.name == assertion.title)
                else {
                    debug!(
                        path = %result.path,
                        title = %assertion.title,
                        "dropping result for unknown assertion"
                    );
                    continue;
                };

                it_block.status = assertion.status;
                it_block.assertion_message = assertion.message.clone();
                it_block.is_executing = false;
                it_block.snapshot_status = SnapshotStatus::from_message(&assertion.message);
            }
        }

        self.last_run_at = Some(Utc::now());
        self.touch();
    }

    /// Merges a coverage report into the non-test file nodes.
    ///
    /// Files absent from the report keep their last known coverage; unlike
    /// the status merge there is no reset. The whole-run total is taken as
    /// the source reports it, never derived by averaging node values.
    pub fn apply_coverage(&mut self, coverage: &impl CoverageSource) {
        for node in self.nodes.values_mut() {
            if node.is_test {
                continue;
            }
            if let Some(summary) = coverage.file_summary(&node.path) {
                node.coverage = summary;
                if let Some(lines) = summary.lines {
                    node.secondary_label = format!("{lines:.1}%");
                }
            }
        }

        self.total_coverage = coverage.run_summary();
        self.touch();
    }

    /// Replaces the aggregate run counters wholesale.
    pub fn apply_totals(&mut self, totals: RunTotals) {
        self.totals = totals;
        self.touch();
    }

    /// Puts every file node into the spinning state and every assertion
    /// into `is_executing`, ahead of a dispatched run.
    ///
    /// Transitions out of this state happen only via [`apply_run_results`]
    /// or a reset; a run that never reports leaves nodes spinning.
    ///
    /// [`apply_run_results`]: SuiteStore::apply_run_results
    pub fn mark_all_executing(&mut self) {
        self.reset_all();

        for node in self.nodes.values_mut() {
            if node.kind == NodeKind::File {
                node.spin();
            }
            for it_block in &mut node.it_blocks {
                it_block.is_executing = true;
            }
        }

        self.touch();
    }

    /// Deselects every node in both indices.
    pub fn unhighlight_all(&mut self) {
        for node in self.nodes.values_mut() {
            node.is_selected = false;
        }
        for node in self.coverage_nodes.values_mut() {
            node.is_selected = false;
        }
        self.touch();
    }

    /// Stores the search query. Views are derived lazily on read.
    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
        self.touch();
    }

    /// Clears run state back to a clean slate: plain file icons, no
    /// executing flags, assertion statuses unknown.
    pub fn reset_status(&mut self) {
        self.reset_all();
        self.touch();
    }

    /// Empties both forests while keeping the flat indices, so collapsing a
    /// view does not discard reconciled state.
    pub fn clear(&mut self) {
        self.files.clear();
        self.tests.clear();
        self.touch();
    }

    /// Top-level file view.
    ///
    /// With an empty query this is the canonical forest's top-level
    /// sequence, unfiltered; otherwise a flat text match over the node
    /// index.
    pub fn visible_files(&self) -> Vec<&TreeNode> {
        if self.search_text.trim().is_empty() {
            return resolve_roots(&self.files, &self.coverage_nodes);
        }
        filter_by_text(&self.nodes, &self.search_text)
    }

    /// Top-level test view; text matches are restricted to test files.
    pub fn visible_tests(&self) -> Vec<&TreeNode> {
        if self.search_text.trim().is_empty() {
            return resolve_roots(&self.tests, &self.nodes);
        }
        filter_by_text_where(&self.nodes, &self.search_text, |node| node.is_test)
    }

    /// Files with at least one failing assertion, keyed by path.
    ///
    /// Assertions keep their declaration order; files with no failures are
    /// omitted.
    pub fn failing_assertions_by_file(&self) -> BTreeMap<String, Vec<Assertion>> {
        let mut failing = BTreeMap::new();

        for node in self.nodes.values() {
            let failed: Vec<Assertion> = node
                .it_blocks
                .iter()
                .filter(|it| it.status == TestStatus::Failed)
                .cloned()
                .collect();

            if !failed.is_empty() {
                failing.insert(node.path.clone(), failed);
            }
        }

        failing
    }

    /// Mutation counter: bumped once per top-level mutation operation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Aggregate counters for the last run.
    pub fn totals(&self) -> RunTotals {
        self.totals
    }

    /// Whole-run coverage summary.
    pub fn total_coverage(&self) -> CoverageSummary {
        self.total_coverage
    }

    /// Current search query.
    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    /// When run results were last merged, if ever.
    pub fn last_run_at(&self) -> Option<DateTime<Utc>> {
        self.last_run_at
    }

    /// Test forest, as pruned at initialization.
    pub fn tests(&self) -> &[TreeIndex] {
        &self.tests
    }

    /// File forest.
    pub fn files(&self) -> &[TreeIndex] {
        &self.files
    }

    // Reset without a revision bump: merges call this as their first step
    // and must count as a single mutation.
    fn reset_all(&mut self) {
        for node in self.nodes.values_mut() {
            node.set_file_icon();
            for it_block in &mut node.it_blocks {
                it_block.is_executing = false;
                it_block.status = TestStatus::Unknown;
            }
        }
    }

    fn touch(&mut self) {
        self.revision += 1;
    }
}

fn resolve_roots<'a>(
    forest: &[TreeIndex],
    index: &'a IndexMap<String, TreeNode>,
) -> Vec<&'a TreeNode> {
    forest
        .iter()
        .filter_map(|entry| index.get(&entry.path))
        .collect()
}
