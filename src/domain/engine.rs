//! Mutation engine: every operation returns a new tree version.
//!
//! Mutations copy the path from the root down to the changed node and share
//! every other subtree with the input tree. An id that is not in the tree
//! (stale, mistyped, or targeting an uninitialized tree) is never an error:
//! the input tree comes back as is.

use std::rc::Rc;

use tracing::{debug, instrument};

use crate::domain::ids::{IdGenerator, SequentialIds};
use crate::domain::node::{NodeId, TreeNode};
use crate::domain::tree::Tree;

/// Owns the id generator and applies structural edits to trees.
#[derive(Debug, Default)]
pub struct TreeEngine<G = SequentialIds> {
    ids: G,
}

impl<G: IdGenerator> TreeEngine<G> {
    pub fn new(ids: G) -> Self {
        Self { ids }
    }

    /// Fresh tree holding a single root with a new id.
    #[instrument(level = "debug", skip(self))]
    pub fn initialize_root(&mut self) -> Tree {
        let root = TreeNode::new(self.ids.next_id());
        debug!("root created: {}", root.id);
        Tree::from_root(Rc::new(root))
    }

    /// Append a fresh child to `parent_id` and expand the parent.
    #[instrument(level = "debug", skip(self, tree))]
    pub fn add_child(&mut self, tree: &Tree, parent_id: &NodeId) -> Tree {
        let ids = &mut self.ids;
        edit_node(tree, parent_id, |parent| {
            let child = TreeNode::new(ids.next_id());
            debug!("child {} added to {}", child.id, parent.id);
            parent.children.push(Rc::new(child));
            parent.is_expanded = true;
        })
    }

    /// Remove `node_id` with its whole subtree. The root stays.
    #[instrument(level = "debug", skip(self, tree))]
    pub fn remove_node(&self, tree: &Tree, node_id: &NodeId) -> Tree {
        let Some(root) = tree.root_rc() else {
            debug!("no tree, nothing to remove");
            return tree.clone();
        };
        if &root.id == node_id {
            debug!("root cannot be removed");
            return tree.clone();
        }
        // first parent in pre-order listing the node, so direct children are
        // checked before descending
        let Some(path) = find_path(root, |node| node.children.iter().any(|c| &c.id == node_id))
        else {
            debug!("node not found: {}", node_id);
            return tree.clone();
        };
        Tree::from_root(rebuild_along(root, &path, |parent| {
            if let Some(idx) = parent.children.iter().position(|c| &c.id == node_id) {
                let removed = parent.children.remove(idx);
                debug!(
                    "removed {} with {} descendants from {}",
                    removed.id,
                    removed.descendant_count(),
                    parent.id
                );
            }
        }))
    }

    #[instrument(level = "debug", skip(self, tree))]
    pub fn update_label(&self, tree: &Tree, node_id: &NodeId, label: &str) -> Tree {
        edit_node(tree, node_id, |node| node.label = label.to_string())
    }

    /// Set the return value, or clear it when `value` is blank.
    #[instrument(level = "debug", skip(self, tree))]
    pub fn update_return_value(&self, tree: &Tree, node_id: &NodeId, value: &str) -> Tree {
        let value = (!value.trim().is_empty()).then(|| value.to_string());
        edit_node(tree, node_id, |node| node.return_value = value.clone())
    }

    #[instrument(level = "debug", skip(self, tree))]
    pub fn toggle_expanded(&self, tree: &Tree, node_id: &NodeId) -> Tree {
        edit_node(tree, node_id, |node| node.is_expanded = !node.is_expanded)
    }
}

/// Apply `edit` to a copy of the node with `id` and rebuild the path to it.
fn edit_node<F>(tree: &Tree, id: &NodeId, edit: F) -> Tree
where
    F: FnOnce(&mut TreeNode),
{
    let Some(root) = tree.root_rc() else {
        debug!("no tree, edit of {} ignored", id);
        return tree.clone();
    };
    match find_path(root, |node| &node.id == id) {
        Some(path) => Tree::from_root(rebuild_along(root, &path, edit)),
        None => {
            debug!("node not found: {}", id);
            tree.clone()
        }
    }
}

/// Child indices from `root` to the first node in pre-order matching `pred`.
///
/// Empty when the root itself matches.
fn find_path<P>(root: &TreeNode, mut pred: P) -> Option<Vec<usize>>
where
    P: FnMut(&TreeNode) -> bool,
{
    if pred(root) {
        return Some(Vec::new());
    }
    // (node, index of the next child to visit)
    let mut stack: Vec<(&TreeNode, usize)> = vec![(root, 0)];
    while let Some(top) = stack.last_mut() {
        let (node, next) = *top;
        let Some(child) = node.children.get(next).map(|c| &**c) else {
            stack.pop();
            continue;
        };
        top.1 += 1;
        if pred(child) {
            return Some(stack.iter().map(|&(_, next)| next - 1).collect());
        }
        stack.push((child, 0));
    }
    None
}

/// Copy the nodes along `path`, apply `edit` to the copy of its last node and
/// share every subtree off the path.
fn rebuild_along<F>(root: &Rc<TreeNode>, path: &[usize], edit: F) -> Rc<TreeNode>
where
    F: FnOnce(&mut TreeNode),
{
    let mut spine = Vec::with_capacity(path.len());
    let mut node = root;
    for &idx in path {
        spine.push(node);
        node = &node.children[idx];
    }

    let mut copy = TreeNode::clone(node);
    edit(&mut copy);
    let mut rebuilt = Rc::new(copy);
    for (parent, &idx) in spine.into_iter().zip(path).rev() {
        let mut copy = TreeNode::clone(parent);
        copy.children[idx] = rebuilt;
        rebuilt = Rc::new(copy);
    }
    rebuilt
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> TreeEngine {
        TreeEngine::new(SequentialIds::default())
    }

    fn child_ids(tree: &Tree, id: &NodeId) -> Vec<String> {
        tree.find(id)
            .map(|node| node.children().iter().map(|c| c.id().to_string()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn given_engine_when_initializing_then_root_is_fresh() {
        let mut engine = engine();
        let tree = engine.initialize_root();
        let root = tree.root().unwrap();
        assert_eq!(tree.len(), 1);
        assert_eq!(root.id().as_str(), "n1");
        assert_eq!(root.label(), "");
        assert!(root.return_value().is_none());
        assert!(root.is_expanded());
    }

    #[test]
    fn given_second_initialize_when_called_then_root_gets_new_id() {
        let mut engine = engine();
        let first = engine.initialize_root();
        let second = engine.initialize_root();
        assert_ne!(first.root().unwrap().id(), second.root().unwrap().id());
        assert_eq!(second.len(), 1);
    }

    #[test]
    fn given_collapsed_parent_when_adding_child_then_parent_expands() {
        let mut engine = engine();
        let tree = engine.initialize_root();
        let root_id = tree.root().unwrap().id().clone();
        let tree = engine.toggle_expanded(&tree, &root_id);
        assert!(!tree.root().unwrap().is_expanded());

        let tree = engine.add_child(&tree, &root_id);
        assert!(tree.root().unwrap().is_expanded());
        assert_eq!(child_ids(&tree, &root_id), vec!["n2"]);
    }

    #[test]
    fn given_unknown_parent_when_adding_child_then_no_id_is_consumed() {
        let mut engine = engine();
        let tree = engine.initialize_root();
        let unchanged = engine.add_child(&tree, &"nope".into());
        assert!(unchanged.ptr_eq(&tree));

        let root_id = tree.root().unwrap().id().clone();
        let tree = engine.add_child(&tree, &root_id);
        assert_eq!(child_ids(&tree, &root_id), vec!["n2"]);
    }

    #[test]
    fn given_nested_child_when_removing_then_only_that_subtree_goes() {
        let mut engine = engine();
        let tree = engine.initialize_root();
        let r = tree.root().unwrap().id().clone();
        let tree = engine.add_child(&tree, &r); // n2
        let tree = engine.add_child(&tree, &r); // n3
        let tree = engine.add_child(&tree, &"n2".into()); // n4
        let tree = engine.add_child(&tree, &"n4".into()); // n5

        let tree = engine.remove_node(&tree, &"n4".into());
        assert_eq!(tree.len(), 3);
        assert!(!tree.contains(&"n5".into()));
        assert_eq!(child_ids(&tree, &r), vec!["n2", "n3"]);
    }

    #[test]
    fn given_blank_value_when_updating_return_value_then_clears_it() {
        let mut engine = engine();
        let tree = engine.initialize_root();
        let r = tree.root().unwrap().id().clone();
        let tree = engine.add_child(&tree, &r);
        let c: NodeId = "n2".into();

        let tree = engine.update_return_value(&tree, &c, "42");
        assert_eq!(tree.find(&c).unwrap().return_value(), Some("42"));

        let tree = engine.update_return_value(&tree, &c, "   ");
        assert_eq!(tree.find(&c).unwrap().return_value(), None);
    }

    #[test]
    fn given_applied_edit_when_comparing_then_spine_is_new_and_siblings_shared() {
        let mut engine = engine();
        let tree = engine.initialize_root();
        let r = tree.root().unwrap().id().clone();
        let tree = engine.add_child(&tree, &r); // n2
        let tree = engine.add_child(&tree, &r); // n3

        let edited = engine.update_label(&tree, &"n2".into(), "fib(4)");
        assert!(!edited.ptr_eq(&tree));

        let old_children = tree.root().unwrap().children();
        let new_children = edited.root().unwrap().children();
        assert!(!Rc::ptr_eq(&old_children[0], &new_children[0]));
        assert!(Rc::ptr_eq(&old_children[1], &new_children[1]));
        assert_eq!(tree.find(&"n2".into()).unwrap().label(), "");
    }

    #[test]
    fn given_uninitialized_tree_when_mutating_then_stays_uninitialized() {
        let mut engine = engine();
        let tree = Tree::uninitialized();
        let id: NodeId = "n1".into();
        assert!(engine.add_child(&tree, &id).is_empty());
        assert!(engine.remove_node(&tree, &id).is_empty());
        assert!(engine.update_label(&tree, &id, "x").is_empty());
        assert!(engine.update_return_value(&tree, &id, "x").is_empty());
        assert!(engine.toggle_expanded(&tree, &id).is_empty());
    }

    #[test]
    fn given_nested_target_when_finding_path_then_returns_child_indices() {
        let mut engine = engine();
        let tree = engine.initialize_root();
        let tree = engine.add_child(&tree, &"n1".into()); // n2
        let tree = engine.add_child(&tree, &"n1".into()); // n3
        let tree = engine.add_child(&tree, &"n3".into()); // n4
        let root = tree.root().unwrap();

        assert_eq!(find_path(root, |n| n.id.as_str() == "n1"), Some(vec![]));
        assert_eq!(find_path(root, |n| n.id.as_str() == "n4"), Some(vec![1, 0]));
        assert_eq!(find_path(root, |n| n.id.as_str() == "n9"), None);
    }
}
