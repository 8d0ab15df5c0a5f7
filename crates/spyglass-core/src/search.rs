//! Tree construction and filtering over the suite tree.
//!
//! Everything here is a pure derivation: filters return new structures and
//! never touch the node records in the flat index.

use indexmap::IndexMap;

use crate::node::{NodeKind, TreeIndex, TreeNode};

/// Wraps top-level entries under a synthetic root for uniform traversal.
///
/// The root carries an empty path and is never shown.
pub fn build_root(children: Vec<TreeIndex>) -> TreeIndex {
    TreeIndex {
        path: String::new(),
        children,
    }
}

/// Produces a pruned copy of `root`.
///
/// Directory entries with zero surviving descendants are removed, as are
/// entries whose path is missing from `nodes`. Child order follows the
/// source; leaf entries are included or excluded, never altered.
pub fn filter_tree(root: &TreeIndex, nodes: &IndexMap<String, TreeNode>) -> TreeIndex {
    TreeIndex {
        path: root.path.clone(),
        children: filter_children(&root.children, nodes),
    }
}

fn filter_children(children: &[TreeIndex], nodes: &IndexMap<String, TreeNode>) -> Vec<TreeIndex> {
    children
        .iter()
        .filter_map(|child| {
            let node = nodes.get(&child.path)?;
            match node.kind {
                NodeKind::Directory => {
                    let kept = filter_children(&child.children, nodes);
                    if kept.is_empty() {
                        None
                    } else {
                        Some(TreeIndex::branch(child.path.clone(), kept))
                    }
                }
                NodeKind::File => Some(child.clone()),
            }
        })
        .collect()
}

/// Case-insensitive substring search over the flat index.
///
/// Matches against label or path, in index order. Search is flat on purpose:
/// depth in the display tree is irrelevant to a text query.
pub fn filter_by_text<'a>(
    nodes: &'a IndexMap<String, TreeNode>,
    query: &str,
) -> Vec<&'a TreeNode> {
    filter_by_text_where(nodes, query, |_| true)
}

/// [`filter_by_text`] restricted to nodes accepted by `predicate`.
pub fn filter_by_text_where<'a, P>(
    nodes: &'a IndexMap<String, TreeNode>,
    query: &str,
    predicate: P,
) -> Vec<&'a TreeNode>
where
    P: Fn(&TreeNode) -> bool,
{
    let needle = query.to_lowercase();
    nodes
        .values()
        .filter(|node| predicate(node))
        .filter(|node| {
            node.label.to_lowercase().contains(&needle)
                || node.path.to_lowercase().contains(&needle)
        })
        .collect()
}
