//! Pre-order traversal with path tracking.

use crate::node::TaxonomyNode;

/// Append `name` to `parent` with `/`; an empty parent yields `name` alone.
pub fn join_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}/{name}")
    }
}

/// A node visited by [`Walk`], with its path and depth (root = 0).
#[derive(Debug, Clone)]
pub struct WalkEntry<'a> {
    pub node: &'a TaxonomyNode,
    pub path: String,
    pub depth: usize,
}

/// Lazy pre-order iterator over a tree. Children are visited in stored order.
///
/// Call [`TaxonomyNode::walk`] again to restart.
#[derive(Debug, Clone)]
pub struct Walk<'a> {
    // (node, parent path, depth); children are pushed in reverse
    stack: Vec<(&'a TaxonomyNode, String, usize)>,
}

impl<'a> Walk<'a> {
    pub(crate) fn new(root: &'a TaxonomyNode, prefix: &str) -> Self {
        Self {
            stack: vec![(root, prefix.to_string(), 0)],
        }
    }
}

impl<'a> Iterator for Walk<'a> {
    type Item = WalkEntry<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let (node, parent, depth) = self.stack.pop()?;
        let path = join_path(&parent, node.display_name());

        for child in node.children().iter().rev() {
            self.stack.push((child, path.clone(), depth + 1));
        }

        Some(WalkEntry { node, path, depth })
    }
}
