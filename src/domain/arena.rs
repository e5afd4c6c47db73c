//! Arena-backed tree used while assembling one lineage bucket.

use generational_arena::{Arena, Index};
use std::collections::HashMap;
use std::fmt;
use tracing::instrument;

use crate::domain::entities::{NodeAttributes, TreeNode};

/// Data payload for arena nodes.
#[derive(Debug, Clone)]
pub struct NodeData {
    /// Member name, or the tree name for a virtual root
    pub name: String,
    pub attributes: NodeAttributes,
}

impl fmt::Display for NodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.attributes.id)
    }
}

/// Node stored in the arena.
#[derive(Debug)]
pub struct ArenaNode {
    pub data: NodeData,
    /// Index of parent node in the arena, None for the root
    pub parent: Option<Index>,
    /// Indices of child nodes in insertion order
    pub children: Vec<Index>,
    /// 1 for the root
    pub depth: usize,
}

/// Arena-based tree structure for one lineage bucket.
///
/// Nodes are linked by generational indices, so assembly never needs
/// recursion or shared ownership. The finished tree is converted into an
/// owned [`TreeNode`] with [`TreeArena::into_tree_node`].
#[derive(Debug)]
pub struct TreeArena {
    arena: Arena<ArenaNode>,
    root: Option<Index>,
}

impl Default for TreeArena {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeArena {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    /// Insert a node below `parent`, or as the root when `parent` is None.
    #[instrument(level = "trace", skip(self))]
    pub fn insert_node(&mut self, data: NodeData, parent: Option<Index>) -> Index {
        let depth = parent
            .and_then(|p| self.arena.get(p))
            .map(|p| p.depth + 1)
            .unwrap_or(1);
        let node = ArenaNode {
            data,
            parent,
            children: Vec::new(),
            depth,
        };
        let node_idx = self.arena.insert(node);

        if let Some(parent_idx) = parent {
            if let Some(parent) = self.arena.get_mut(parent_idx) {
                parent.children.push(node_idx);
            }
        } else {
            self.root = Some(node_idx);
        }

        node_idx
    }

    pub fn get_node(&self, idx: Index) -> Option<&ArenaNode> {
        self.arena.get(idx)
    }

    pub fn root(&self) -> Option<Index> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self)
    }

    pub fn iter_postorder(&self) -> PostOrderIterator<'_> {
        PostOrderIterator::new(self)
    }

    /// Deepest level in the tree, 0 for an empty arena.
    pub fn depth(&self) -> usize {
        self.arena.iter().map(|(_, n)| n.depth).max().unwrap_or(0)
    }

    /// Convert into an owned tree, children in insertion order.
    ///
    /// Built bottom-up from a post-order walk, so every child is finished
    /// before its parent claims it.
    #[instrument(level = "trace", skip(self))]
    pub fn into_tree_node(mut self) -> Option<TreeNode> {
        let root = self.root?;
        let order: Vec<Index> = self.iter_postorder().map(|(idx, _)| idx).collect();
        let mut built: HashMap<Index, TreeNode> = HashMap::with_capacity(order.len());

        for idx in order {
            let node = self.arena.remove(idx)?;
            let children = node
                .children
                .iter()
                .filter_map(|child| built.remove(child))
                .collect();
            built.insert(
                idx,
                TreeNode {
                    name: node.data.name,
                    attributes: node.data.attributes,
                    children,
                },
            );
        }

        built.remove(&root)
    }
}

/// Pre-order traversal, children left to right.
pub struct TreeIterator<'a> {
    arena: &'a TreeArena,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(arena: &'a TreeArena) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = arena.root() {
            stack.push(root);
        }
        Self { arena, stack }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a ArenaNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}

/// Post-order traversal: children before their parent.
pub struct PostOrderIterator<'a> {
    arena: &'a TreeArena,
    stack: Vec<(Index, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(arena: &'a TreeArena) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = arena.root() {
            stack.push((root, false));
        }
        Self { arena, stack }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (Index, &'a ArenaNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                if !visited {
                    self.stack.push((current_idx, true));
                    for &child in node.children.iter().rev() {
                        self.stack.push((child, false));
                    }
                } else {
                    return Some((current_idx, node));
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(name: &str) -> NodeData {
        NodeData {
            name: name.to_string(),
            attributes: NodeAttributes {
                id: name.to_lowercase(),
                ..NodeAttributes::default()
            },
        }
    }

    //      root
    //      /  \
    // child1 child2
    //    |
    // grandchild1
    fn sample() -> TreeArena {
        let mut tree = TreeArena::new();
        let root = tree.insert_node(data("root"), None);
        let child1 = tree.insert_node(data("child1"), Some(root));
        tree.insert_node(data("child2"), Some(root));
        tree.insert_node(data("grandchild1"), Some(child1));
        tree
    }

    #[test]
    fn given_tree_when_iterating_pre_order_then_visits_left_to_right() {
        let tree = sample();
        let names: Vec<_> = tree.iter().map(|(_, n)| n.data.name.as_str()).collect();
        assert_eq!(names, vec!["root", "child1", "grandchild1", "child2"]);
    }

    #[test]
    fn given_tree_when_iterating_post_order_then_children_come_first() {
        let tree = sample();
        let names: Vec<_> = tree
            .iter_postorder()
            .map(|(_, n)| n.data.name.as_str())
            .collect();
        assert_eq!(names, vec!["grandchild1", "child1", "child2", "root"]);
    }

    #[test]
    fn given_tree_when_converting_then_keeps_shape_and_order() {
        let tree = sample();
        assert_eq!(tree.depth(), 3);

        let node = tree.into_tree_node().unwrap();

        assert_eq!(node.name, "root");
        assert_eq!(node.children.len(), 2);
        assert_eq!(node.children[0].name, "child1");
        assert_eq!(node.children[0].children[0].name, "grandchild1");
        assert!(node.children[1].is_leaf());
    }

    #[test]
    fn given_empty_arena_when_converting_then_returns_none() {
        let tree = TreeArena::new();
        assert!(tree.is_empty());
        assert_eq!(tree.depth(), 0);
        assert!(tree.into_tree_node().is_none());
    }
}
