//! Tree nodes and their identifiers

use std::fmt;
use std::rc::Rc;

/// Opaque identifier of a node, unique within one tree for its lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A labeled node in a call tree.
///
/// Children are reference counted so that tree versions can share every
/// subtree that a mutation did not touch. A node is never mutated once it is
/// reachable from a [`Tree`](crate::domain::Tree); the engine copies it.
///
/// Equality, dropping and the descendant count walk the subtree with an
/// explicit work stack, so a tree may be arbitrarily deep.
#[derive(Clone)]
pub struct TreeNode {
    pub(crate) id: NodeId,
    pub(crate) label: String,
    /// Annotation on the edge from the parent to this node
    pub(crate) return_value: Option<String>,
    pub(crate) children: Vec<Rc<TreeNode>>,
    pub(crate) is_expanded: bool,
}

impl TreeNode {
    /// Fresh node: empty label, no return value, no children, expanded.
    pub fn new(id: NodeId) -> Self {
        Self {
            id,
            label: String::new(),
            return_value: None,
            children: Vec::new(),
            is_expanded: true,
        }
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn return_value(&self) -> Option<&str> {
        self.return_value.as_deref()
    }

    pub fn children(&self) -> &[Rc<TreeNode>] {
        &self.children
    }

    pub fn is_expanded(&self) -> bool {
        self.is_expanded
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Whether the children of this node are shown. Leaves never are.
    pub fn shows_children(&self) -> bool {
        self.is_expanded && self.has_children()
    }

    /// Number of nodes below this one, at any depth.
    pub fn descendant_count(&self) -> usize {
        let mut count = 0;
        let mut pending: Vec<&TreeNode> = self.children.iter().map(|c| &**c).collect();
        while let Some(node) = pending.pop() {
            count += 1;
            pending.extend(node.children.iter().map(|c| &**c));
        }
        count
    }

    fn same_fields(&self, other: &TreeNode) -> bool {
        self.id == other.id
            && self.label == other.label
            && self.return_value == other.return_value
            && self.is_expanded == other.is_expanded
            && self.children.len() == other.children.len()
    }
}

impl PartialEq for TreeNode {
    fn eq(&self, other: &Self) -> bool {
        let mut pending = vec![(self, other)];
        while let Some((a, b)) = pending.pop() {
            if !a.same_fields(b) {
                return false;
            }
            // shared subtrees are equal without looking inside
            pending.extend(
                a.children
                    .iter()
                    .zip(&b.children)
                    .filter(|(x, y)| !Rc::ptr_eq(x, y))
                    .map(|(x, y)| (&**x, &**y)),
            );
        }
        true
    }
}

impl Eq for TreeNode {}

impl fmt::Debug for TreeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeNode")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("return_value", &self.return_value)
            .field("is_expanded", &self.is_expanded)
            .field("children", &self.children.len())
            .finish()
    }
}

impl Drop for TreeNode {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(child) = pending.pop() {
            // subtrees still shared with another version stay alive
            if let Ok(mut node) = Rc::try_unwrap(child) {
                pending.append(&mut node.children);
            }
        }
    }
}
