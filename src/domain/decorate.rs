//! Search and year-filter highlighting for rendered trees.

use tracing::instrument;

use crate::domain::entities::{fold_tree, Decoration, DecoratedTreeNode, LineageTree, TreeNode};

/// True when a query or year filter is in effect.
pub fn is_search_active(search_query: &str, selected_year: Option<i32>) -> bool {
    !search_query.trim().is_empty() || selected_year.is_some()
}

/// Normalized search inputs, prepared once per render pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFilter {
    /// Trimmed, lowercased name query; empty means no name search
    query: String,
    /// Selected graduation year in attribute form
    year: Option<String>,
}

impl SearchFilter {
    pub fn new(search_query: &str, selected_year: Option<i32>) -> Self {
        Self {
            query: search_query.trim().to_lowercase(),
            year: selected_year.map(|y| y.to_string()),
        }
    }

    pub fn is_active(&self) -> bool {
        !self.query.is_empty() || self.year.is_some()
    }

    /// Whether `node` matches the name query or the selected graduation year.
    ///
    /// Name matching is a case-insensitive substring test; a blank query never
    /// matches by name.
    pub fn matches(&self, node: &TreeNode) -> bool {
        let name_match = !self.query.is_empty() && node.name.to_lowercase().contains(&self.query);
        let year_match =
            self.year.is_some() && node.attributes.graduation_year.as_deref() == self.year.as_deref();
        name_match || year_match
    }
}

/// Decorated copy of `node`; the input tree is left untouched.
#[instrument(level = "debug", skip(node), fields(root = %node.name))]
pub fn annotate(node: &TreeNode, search_query: &str, selected_year: Option<i32>) -> DecoratedTreeNode {
    decorate(node, &SearchFilter::new(search_query, selected_year))
}

/// Decorate every tree of a forest with the same query.
pub fn annotate_forest(
    trees: &[LineageTree],
    search_query: &str,
    selected_year: Option<i32>,
) -> Vec<(String, DecoratedTreeNode)> {
    let filter = SearchFilter::new(search_query, selected_year);
    trees
        .iter()
        .map(|t| (t.name.clone(), decorate(&t.root, &filter)))
        .collect()
}

fn decorate(root: &TreeNode, filter: &SearchFilter) -> DecoratedTreeNode {
    let search_active = filter.is_active();
    fold_tree(root, |n| n.children.as_slice(), |node, children| {
        DecoratedTreeNode {
            name: node.name.clone(),
            attributes: node.attributes.clone(),
            decoration: Decoration {
                highlighted: filter.matches(node),
                search_active,
            },
            children,
        }
    })
}
