//! Domain entities: member records and the tree shapes built from them

use serde::{Deserialize, Serialize};

/// Bucket label for members without a tree name.
pub const DEFAULT_TREE_NAME: &str = "Unnamed Tree";

/// Identifier carried by synthesized roots.
pub const VIRTUAL_ROOT_ID: &str = "virtual-root";

/// A club member as fetched from the member store.
///
/// Field names follow the store's camelCase JSON shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub graduation_year: Option<i32>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Id of this member's mentor, resolved within the same tree only
    #[serde(default)]
    pub mentor_id: Option<String>,
    #[serde(default)]
    pub tree_name: Option<String>,
}

impl MemberRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            graduation_year: None,
            role: None,
            image_url: None,
            mentor_id: None,
            tree_name: None,
        }
    }

    pub fn with_mentor(mut self, mentor_id: impl Into<String>) -> Self {
        self.mentor_id = Some(mentor_id.into());
        self
    }

    pub fn with_tree(mut self, tree_name: impl Into<String>) -> Self {
        self.tree_name = Some(tree_name.into());
        self
    }

    pub fn with_graduation_year(mut self, year: i32) -> Self {
        self.graduation_year = Some(year);
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    /// Mentor id if set and non-empty.
    pub fn mentor(&self) -> Option<&str> {
        self.mentor_id.as_deref().filter(|m| !m.is_empty())
    }

    /// Tree name, or `default` for a missing or empty label.
    pub fn tree_label<'a>(&'a self, default: &'a str) -> &'a str {
        match self.tree_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => default,
        }
    }
}

/// Typed annotations shown on a tree node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeAttributes {
    pub id: String,
    /// Graduation year rendered as text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graduation_year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl NodeAttributes {
    /// Attributes for a member node. A zero year and empty role and image
    /// strings are dropped.
    pub fn from_member(member: &MemberRecord) -> Self {
        Self {
            id: member.id.clone(),
            graduation_year: member
                .graduation_year
                .filter(|y| *y != 0)
                .map(|y| y.to_string()),
            role: member.role.clone().filter(|r| !r.is_empty()),
            image_url: member.image_url.clone().filter(|u| !u.is_empty()),
        }
    }

    /// Attributes for a synthesized root: the sentinel id only.
    pub fn virtual_root(sentinel: &str) -> Self {
        Self {
            id: sentinel.to_string(),
            ..Self::default()
        }
    }
}

/// Node of a lineage tree, ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    pub name: String,
    pub attributes: NodeAttributes,
    /// Empty for leaves
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn leaf(name: impl Into<String>, attributes: NodeAttributes) -> Self {
        Self {
            name: name.into(),
            attributes,
            children: Vec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn is_virtual_root(&self, sentinel: &str) -> bool {
        self.attributes.id == sentinel
    }

    /// Pre-order iterator, children left to right.
    pub fn iter(&self) -> TreeNodeIter<'_> {
        TreeNodeIter { stack: vec![self] }
    }

    /// Number of levels, counting this node.
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack = vec![(self, 1)];

        while let Some((node, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            for child in &node.children {
                stack.push((child, depth + 1));
            }
        }

        max_depth
    }

    /// Members in this subtree, not counting nodes carrying `sentinel`.
    pub fn member_count(&self, sentinel: &str) -> usize {
        self.iter().filter(|n| !n.is_virtual_root(sentinel)).count()
    }

    /// Names of all leaf nodes, left to right.
    pub fn leaf_names(&self) -> Vec<&str> {
        self.iter()
            .filter(|n| n.is_leaf())
            .map(|n| n.name.as_str())
            .collect()
    }
}

pub struct TreeNodeIter<'a> {
    stack: Vec<&'a TreeNode>,
}

impl<'a> Iterator for TreeNodeIter<'a> {
    type Item = &'a TreeNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        // Reverse push keeps left-to-right order
        for child in node.children.iter().rev() {
            self.stack.push(child);
        }
        Some(node)
    }
}

/// Rebuild a tree bottom-up with an explicit stack.
///
/// `build` sees every node once, after all of its children, and gets their
/// results in order.
pub fn fold_tree<'a, N, U>(
    root: &'a N,
    children: impl Fn(&'a N) -> &'a [N],
    mut build: impl FnMut(&'a N, Vec<U>) -> U,
) -> U {
    // (node, children already pushed)
    let mut pending = vec![(root, false)];
    let mut built: Vec<U> = Vec::new();

    while let Some((node, expanded)) = pending.pop() {
        let kids = children(node);
        if expanded {
            let results = built.split_off(built.len() - kids.len());
            let value = build(node, results);
            if pending.is_empty() {
                return value;
            }
            built.push(value);
        } else {
            pending.push((node, true));
            pending.extend(kids.iter().rev().map(|kid| (kid, false)));
        }
    }

    unreachable!("the root is always built last")
}

/// One rendered family tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineageTree {
    pub name: String,
    pub root: TreeNode,
}

/// Presentation flags computed per render pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Decoration {
    pub highlighted: bool,
    pub search_active: bool,
}

/// Copy of a [`TreeNode`] with highlight flags attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecoratedTreeNode {
    pub name: String,
    pub attributes: NodeAttributes,
    pub decoration: Decoration,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<DecoratedTreeNode>,
}

impl DecoratedTreeNode {
    pub fn iter(&self) -> impl Iterator<Item = &DecoratedTreeNode> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }
}
