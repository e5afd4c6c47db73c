//! Text rendering of lineage trees via termtree.

use termtree::Tree;

use crate::domain::entities::{
    fold_tree, DecoratedTreeNode, NodeAttributes, TreeNode, VIRTUAL_ROOT_ID,
};

pub trait TreeNodeConvert {
    /// Render with the default virtual root sentinel.
    fn to_tree_string(&self) -> Tree<String> {
        self.to_tree_string_with(VIRTUAL_ROOT_ID)
    }

    /// Render, showing nodes whose id equals `virtual_root_id` as `[Tree Name]`.
    fn to_tree_string_with(&self, virtual_root_id: &str) -> Tree<String>;
}

impl TreeNodeConvert for TreeNode {
    fn to_tree_string_with(&self, virtual_root_id: &str) -> Tree<String> {
        fold_tree(self, |n| n.children.as_slice(), |node, leaves: Vec<Tree<String>>| {
            Tree::new(node_label(&node.name, &node.attributes, virtual_root_id)).with_leaves(leaves)
        })
    }
}

impl TreeNodeConvert for DecoratedTreeNode {
    fn to_tree_string_with(&self, virtual_root_id: &str) -> Tree<String> {
        fold_tree(self, |n| n.children.as_slice(), |node, leaves: Vec<Tree<String>>| {
            let mut label = node_label(&node.name, &node.attributes, virtual_root_id);
            if node.decoration.highlighted {
                label.push_str(" *");
            }
            Tree::new(label).with_leaves(leaves)
        })
    }
}

/// `Name (Class of 2021, Role)`, or `[Tree Name]` for a virtual root.
pub fn node_label(name: &str, attributes: &NodeAttributes, virtual_root_id: &str) -> String {
    if attributes.id == virtual_root_id {
        return format!("[{}]", name);
    }

    let details: Vec<String> = attributes
        .graduation_year
        .iter()
        .map(|y| format!("Class of {}", y))
        .chain(attributes.role.iter().cloned())
        .collect();

    if details.is_empty() {
        name.to_string()
    } else {
        format!("{} ({})", name, details.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::decorate::annotate;

    fn sample() -> TreeNode {
        let mut root = TreeNode::leaf("Sigma Tree", NodeAttributes::virtual_root(VIRTUAL_ROOT_ID));
        root.children.push(TreeNode::leaf(
            "Eve Johnson",
            NodeAttributes {
                id: "e".into(),
                graduation_year: Some("2020".into()),
                role: Some("President".into()),
                image_url: None,
            },
        ));
        root.children.push(TreeNode::leaf(
            "Frank Liu",
            NodeAttributes {
                id: "f".into(),
                ..NodeAttributes::default()
            },
        ));
        root
    }

    #[test]
    fn given_virtual_root_when_rendering_then_shows_bracketed_tree_name() {
        let rendered = sample().to_tree_string().to_string();
        let lines: Vec<_> = rendered.lines().collect();

        assert_eq!(lines[0], "[Sigma Tree]");
        assert!(lines[1].ends_with("Eve Johnson (Class of 2020, President)"));
        assert!(lines[2].ends_with("Frank Liu"));
    }

    #[test]
    fn given_highlighted_node_when_rendering_then_marks_it() {
        let decorated = annotate(&sample(), "frank", None);
        let rendered = decorated.to_tree_string().to_string();

        assert!(rendered.contains("Frank Liu *"));
        assert!(!rendered.contains("Eve Johnson (Class of 2020, President) *"));
    }
}
