//! Queries over a built forest: tree selection and year-filter choices.

use itertools::Itertools;

use crate::domain::entities::LineageTree;

/// Tree names in forest order.
pub fn tree_names(trees: &[LineageTree]) -> Vec<&str> {
    trees.iter().map(|t| t.name.as_str()).collect()
}

/// Tree to show for a requested name.
///
/// Without a request the first tree is selected. An unknown name selects
/// nothing.
pub fn select_tree<'a>(trees: &'a [LineageTree], name: Option<&str>) -> Option<&'a LineageTree> {
    match name {
        Some(name) => trees.iter().find(|t| t.name == name),
        None => trees.first(),
    }
}

/// Distinct graduation years across all trees, newest first.
pub fn graduation_years(trees: &[LineageTree]) -> Vec<i32> {
    trees
        .iter()
        .flat_map(|t| t.root.iter())
        .filter_map(|n| n.attributes.graduation_year.as_deref())
        .filter_map(|y| y.parse::<i32>().ok())
        .unique()
        .sorted_unstable_by(|a, b| b.cmp(a))
        .collect()
}
