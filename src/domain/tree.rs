//! Immutable tree value and read-only traversal

use std::rc::Rc;

use tracing::instrument;

use crate::domain::node::{NodeId, TreeNode};

/// A rooted call tree, or nothing before the root has been created.
///
/// Cloning is cheap: it bumps the reference count of the root. Two trees
/// compare equal when their nodes are deep-equal; use [`Tree::ptr_eq`] to ask
/// whether they are the same version.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    root: Option<Rc<TreeNode>>,
}

impl Tree {
    /// Tree without a root.
    pub fn uninitialized() -> Self {
        Self::default()
    }

    pub(crate) fn from_root(root: Rc<TreeNode>) -> Self {
        Self { root: Some(root) }
    }

    pub(crate) fn root_rc(&self) -> Option<&Rc<TreeNode>> {
        self.root.as_ref()
    }

    pub fn root(&self) -> Option<&TreeNode> {
        self.root.as_deref()
    }

    pub fn is_initialized(&self) -> bool {
        self.root.is_some()
    }

    /// Number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Reference identity of the two roots.
    ///
    /// An applied mutation always yields a tree that is not `ptr_eq` to its
    /// input; a no-op yields one that is.
    pub fn ptr_eq(&self, other: &Tree) -> bool {
        match (&self.root, &other.root) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }

    /// First node with `id` in depth-first pre-order.
    #[instrument(level = "trace", skip(self))]
    pub fn find(&self, id: &NodeId) -> Option<&TreeNode> {
        self.iter().map(|(_, node)| node).find(|node| &node.id == id)
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.find(id).is_some()
    }

    /// Parent of the node with `id`. `None` for the root and unknown ids.
    #[instrument(level = "trace", skip(self))]
    pub fn parent_of(&self, id: &NodeId) -> Option<&TreeNode> {
        self.iter()
            .map(|(_, node)| node)
            .find(|node| node.children.iter().any(|child| &child.id == id))
    }

    /// Pre-order walk yielding `(depth, node)`, the root at depth 0.
    pub fn iter(&self) -> PreOrderIter<'_> {
        PreOrderIter::new(self)
    }

    /// Height of the tree: 1 for a lone root, 0 without a root.
    pub fn depth(&self) -> usize {
        self.iter().map(|(depth, _)| depth + 1).max().unwrap_or(0)
    }

    /// Nodes without children, left to right.
    pub fn leaf_nodes(&self) -> Vec<&TreeNode> {
        self.iter()
            .map(|(_, node)| node)
            .filter(|node| !node.has_children())
            .collect()
    }

    /// Ids of all nodes in pre-order.
    pub fn ids(&self) -> Vec<&NodeId> {
        self.iter().map(|(_, node)| node.id()).collect()
    }
}

pub struct PreOrderIter<'a> {
    stack: Vec<(usize, &'a TreeNode)>,
}

impl<'a> PreOrderIter<'a> {
    fn new(tree: &'a Tree) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = tree.root() {
            stack.push((0, root));
        }
        Self { stack }
    }
}

impl<'a> Iterator for PreOrderIter<'a> {
    type Item = (usize, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;
        // reversed so the leftmost child is popped first
        for child in node.children.iter().rev() {
            self.stack.push((depth + 1, child));
        }
        Some((depth, node))
    }
}
