//! Text rendering of call trees with termtree
//!
//! One line per visible node. The return value of a node is printed on its
//! line because that line is the end of the edge from its parent; the root
//! has no incoming edge, so its return value is never shown. Nodes deeper
//! than `max_depth` are folded into their ancestor at that depth.

use termtree::Tree as TermTree;
use tracing::instrument;

use crate::config::Settings;
use crate::domain::{Tree, TreeNode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub placeholder: String,
    pub show_ids: bool,
    pub show_hidden_count: bool,
    /// Deepest level that still lists its children; the root is level 0
    pub max_depth: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions::from(&Settings::default())
    }
}

impl From<&Settings> for RenderOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            placeholder: settings.placeholder.clone(),
            show_ids: settings.show_ids,
            show_hidden_count: settings.show_hidden_count,
            max_depth: settings.max_depth,
        }
    }
}

pub trait ToTermTree {
    fn to_term_tree(&self, options: &RenderOptions) -> TermTree<String>;
}

impl ToTermTree for Tree {
    #[instrument(level = "trace", skip(self))]
    fn to_term_tree(&self, options: &RenderOptions) -> TermTree<String> {
        match self.root() {
            Some(root) => build(root, options),
            None => TermTree::new("(no tree)".to_string()),
        }
    }
}

/// Subtree under construction: children are appended to `leaves` as they
/// finish.
struct Frame<'a> {
    node: &'a TreeNode,
    depth: usize,
    next: usize,
    leaves: Vec<TermTree<String>>,
}

impl<'a> Frame<'a> {
    fn new(node: &'a TreeNode, depth: usize) -> Self {
        Self {
            node,
            depth,
            next: 0,
            leaves: Vec::new(),
        }
    }

    fn truncated(&self, options: &RenderOptions) -> bool {
        self.node.shows_children() && self.depth >= options.max_depth
    }

    fn finish(self, options: &RenderOptions) -> TermTree<String> {
        let mut line = node_line(self.node, self.depth == 0, options);
        if self.truncated(options) {
            line.push_str(&format!(" (+{} below)", self.node.descendant_count()));
        }
        TermTree::new(line).with_leaves(self.leaves)
    }
}

fn build(root: &TreeNode, options: &RenderOptions) -> TermTree<String> {
    let mut stack = vec![Frame::new(root, 0)];
    let mut built = None;
    while let Some(top) = stack.last_mut() {
        let node = top.node;
        if node.shows_children() && !top.truncated(options) {
            if let Some(child) = node.children().get(top.next) {
                top.next += 1;
                let depth = top.depth + 1;
                stack.push(Frame::new(child, depth));
                continue;
            }
        }
        let Some(done) = stack.pop() else { break };
        let subtree = done.finish(options);
        match stack.last_mut() {
            Some(parent) => parent.leaves.push(subtree),
            None => built = Some(subtree),
        }
    }
    built.unwrap_or_else(|| TermTree::new(String::new()))
}

/// Display line of a single node, without tree glyphs.
pub fn node_line(node: &TreeNode, is_root: bool, options: &RenderOptions) -> String {
    let mut line = if node.label().is_empty() {
        options.placeholder.clone()
    } else {
        node.label().to_string()
    };
    if options.show_ids {
        line.push_str(&format!(" [{}]", node.id()));
    }
    if !is_root {
        if let Some(value) = node.return_value() {
            line.push_str(&format!(" -> {value}"));
        }
    }
    if options.show_hidden_count && node.has_children() && !node.is_expanded() {
        line.push_str(&format!(" (+{} hidden)", node.children().len()));
    }
    line
}

/// Render a tree to a printable string.
pub fn render(tree: &Tree, options: &RenderOptions) -> String {
    tree.to_term_tree(options).to_string()
}
