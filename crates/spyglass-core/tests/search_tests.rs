use indexmap::IndexMap;
use pretty_assertions::assert_eq;

use spyglass_core::search::{build_root, filter_by_text, filter_by_text_where, filter_tree};
use spyglass_core::{TreeIndex, TreeNode};

fn index_of(nodes: Vec<TreeNode>) -> IndexMap<String, TreeNode> {
    nodes.into_iter().map(|n| (n.path.clone(), n)).collect()
}

#[test]
fn test_build_root_wraps_children() {
    let root = build_root(vec![TreeIndex::leaf("a.ts"), TreeIndex::leaf("b.ts")]);

    assert_eq!(root.path, "");
    assert_eq!(root.children.len(), 2);
    assert_eq!(root.children[0].path, "a.ts");
}

#[test]
fn test_filter_tree_prunes_empty_directories_at_any_depth() {
    let nodes = index_of(vec![
        TreeNode::directory("empty"),
        TreeNode::directory("src"),
        TreeNode::directory("src/hollow"),
        TreeNode::file("src/a.ts"),
    ]);
    let root = build_root(vec![
        TreeIndex::branch("empty", vec![]),
        TreeIndex::branch(
            "src",
            vec![
                TreeIndex::branch("src/hollow", vec![]),
                TreeIndex::leaf("src/a.ts"),
            ],
        ),
    ]);

    let filtered = filter_tree(&root, &nodes);

    assert_eq!(filtered.children.len(), 1);
    assert_eq!(filtered.children[0].path, "src");
    assert_eq!(filtered.children[0].children.len(), 1);
    assert_eq!(filtered.children[0].children[0].path, "src/a.ts");
}

#[test]
fn test_filter_tree_keeps_directories_with_deep_survivors() {
    let nodes = index_of(vec![
        TreeNode::directory("a"),
        TreeNode::directory("a/b"),
        TreeNode::file("a/b/deep.ts"),
    ]);
    let root = build_root(vec![TreeIndex::branch(
        "a",
        vec![TreeIndex::branch("a/b", vec![TreeIndex::leaf("a/b/deep.ts")])],
    )]);

    let filtered = filter_tree(&root, &nodes);

    assert_eq!(filtered.children[0].path, "a");
    assert_eq!(filtered.children[0].children[0].path, "a/b");
    assert_eq!(
        filtered.children[0].children[0].children[0].path,
        "a/b/deep.ts"
    );
}

#[test]
fn test_filter_tree_preserves_child_order_and_leaves() {
    let nodes = index_of(vec![
        TreeNode::file("z.ts"),
        TreeNode::file("a.ts"),
        TreeNode::file("m.ts"),
    ]);
    let root = build_root(vec![
        TreeIndex::leaf("z.ts"),
        TreeIndex::leaf("a.ts"),
        TreeIndex::leaf("m.ts"),
    ]);

    let filtered = filter_tree(&root, &nodes);

    let order: Vec<&str> = filtered.children.iter().map(|c| c.path.as_str()).collect();
    assert_eq!(order, vec!["z.ts", "a.ts", "m.ts"]);
}

#[test]
fn test_filter_tree_drops_entries_missing_from_the_index() {
    let nodes = index_of(vec![TreeNode::file("known.ts")]);
    let root = build_root(vec![
        TreeIndex::leaf("known.ts"),
        TreeIndex::leaf("ghost.ts"),
    ]);

    let filtered = filter_tree(&root, &nodes);

    assert_eq!(filtered.children.len(), 1);
    assert_eq!(filtered.children[0].path, "known.ts");
}

#[test]
fn test_filter_by_text_matches_label_or_path() {
    let nodes = index_of(vec![
        TreeNode::file("src/button.ts"),
        TreeNode::file("src/input.ts"),
        TreeNode::file("widgets/form.ts"),
    ]);

    // "button" matches the label, "widgets" only the path
    let by_label: Vec<&str> = filter_by_text(&nodes, "BUTTON")
        .iter()
        .map(|n| n.path.as_str())
        .collect();
    assert_eq!(by_label, vec!["src/button.ts"]);

    let by_path: Vec<&str> = filter_by_text(&nodes, "widgets")
        .iter()
        .map(|n| n.path.as_str())
        .collect();
    assert_eq!(by_path, vec!["widgets/form.ts"]);
}

#[test]
fn test_filter_by_text_preserves_index_order() {
    let nodes = index_of(vec![
        TreeNode::file("src/a.ts"),
        TreeNode::file("src/b.ts"),
        TreeNode::file("test/a.spec.ts"),
    ]);

    let matched: Vec<&str> = filter_by_text(&nodes, "a")
        .iter()
        .map(|n| n.path.as_str())
        .collect();
    assert_eq!(matched, vec!["src/a.ts", "test/a.spec.ts"]);
}

#[test]
fn test_filter_by_text_where_applies_predicate() {
    let nodes = index_of(vec![
        TreeNode::file("src/a.ts"),
        TreeNode::test_file("src/a.test.ts"),
    ]);

    let tests_only: Vec<&str> = filter_by_text_where(&nodes, "a", |n| n.is_test)
        .iter()
        .map(|n| n.path.as_str())
        .collect();
    assert_eq!(tests_only, vec!["src/a.test.ts"]);
}
