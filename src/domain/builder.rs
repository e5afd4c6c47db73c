//! Forest builder: groups member records into one tree per tree name.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use lexical_sort::lexical_cmp;
use tracing::{debug, instrument, warn};

use crate::domain::arena::{NodeData, TreeArena};
use crate::domain::entities::{
    LineageTree, MemberRecord, NodeAttributes, DEFAULT_TREE_NAME, VIRTUAL_ROOT_ID,
};
use crate::domain::error::{DomainError, TreeResult};

/// Hard ceiling on mentor chain length.
///
/// Owned trees are dropped and serialized recursively; no tree is built deeper
/// than this.
pub const MAX_DEPTH_LIMIT: usize = 1024;

/// Default cap on mentor chain length.
pub const DEFAULT_MAX_DEPTH: usize = MAX_DEPTH_LIMIT;

/// Knobs for forest construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    /// Bucket label for members without a tree name
    pub default_tree_name: String,
    /// Id given to synthesized roots
    pub virtual_root_id: String,
    /// Longest allowed mentor chain, clamped to [`MAX_DEPTH_LIMIT`]; 0 selects the limit
    pub max_depth: usize,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            default_tree_name: DEFAULT_TREE_NAME.to_string(),
            virtual_root_id: VIRTUAL_ROOT_ID.to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Build the lineage forest with default options.
pub fn build_forests(members: &[MemberRecord]) -> TreeResult<Vec<LineageTree>> {
    ForestBuilder::new().build(members)
}

/// Constructs lineage trees from flat member records.
///
/// Members are partitioned by tree name. Within a partition a member's mentor
/// is looked up by id; members whose mentor is missing, empty or lives in
/// another partition become roots. A partition with several roots gets a
/// virtual root named after the tree.
pub struct ForestBuilder {
    options: BuildOptions,
    /// Record index of mentor -> record indices of mentees, in input order
    children_cache: HashMap<usize, Vec<usize>>,
    visited: HashSet<usize>,
}

impl Default for ForestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ForestBuilder {
    pub fn new() -> Self {
        Self::with_options(BuildOptions::default())
    }

    pub fn with_options(options: BuildOptions) -> Self {
        Self {
            options,
            children_cache: HashMap::new(),
            visited: HashSet::new(),
        }
    }

    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    /// Effective chain length cap.
    pub fn depth_cap(&self) -> usize {
        match self.options.max_depth {
            0 => MAX_DEPTH_LIMIT,
            n => n.min(MAX_DEPTH_LIMIT),
        }
    }

    /// Build one tree per tree name, sorted by tree name.
    ///
    /// Fails as a whole on the first invalid record, mentor cycle or over-deep
    /// chain; no partial forest is returned.
    #[instrument(level = "debug", skip(self, members), fields(members = members.len()))]
    pub fn build(&mut self, members: &[MemberRecord]) -> TreeResult<Vec<LineageTree>> {
        validate(members)?;

        let buckets = self.partition(members);
        debug!("partitioned into {} buckets", buckets.len());

        let mut trees = Vec::with_capacity(buckets.len());
        for (tree_name, bucket) in buckets {
            if let Some(tree) = self.build_bucket(&tree_name, &bucket, members)? {
                trees.push(tree);
            }
        }

        trees.sort_by(|a, b| compare_tree_names(&a.name, &b.name));
        Ok(trees)
    }

    /// Group record indices by tree label, buckets in first-seen order.
    fn partition(&self, members: &[MemberRecord]) -> Vec<(String, Vec<usize>)> {
        let mut positions: HashMap<String, usize> = HashMap::new();
        let mut buckets: Vec<(String, Vec<usize>)> = Vec::new();

        for (idx, member) in members.iter().enumerate() {
            let label = member.tree_label(&self.options.default_tree_name);
            match positions.get(label) {
                Some(&pos) => buckets[pos].1.push(idx),
                None => {
                    positions.insert(label.to_string(), buckets.len());
                    buckets.push((label.to_string(), vec![idx]));
                }
            }
        }

        buckets
    }

    #[instrument(level = "debug", skip(self, bucket, members), fields(size = bucket.len()))]
    fn build_bucket(
        &mut self,
        tree_name: &str,
        bucket: &[usize],
        members: &[MemberRecord],
    ) -> TreeResult<Option<LineageTree>> {
        self.children_cache.clear();
        self.visited.clear();

        // Index restricted to this bucket; last record wins on duplicate ids
        let mut by_id: HashMap<&str, usize> = HashMap::with_capacity(bucket.len());
        for &idx in bucket {
            let id = members[idx].id.as_str();
            if let Some(previous) = by_id.insert(id, idx) {
                warn!(
                    "duplicate member id '{}' in tree '{}' (records {} and {}), using the later one",
                    id, tree_name, previous, idx
                );
            }
        }

        let mut roots = Vec::new();
        for &idx in bucket {
            let member = &members[idx];
            match member.mentor().and_then(|m| by_id.get(m)) {
                Some(&mentor_idx) => self.children_cache.entry(mentor_idx).or_default().push(idx),
                None => {
                    if let Some(mentor) = member.mentor() {
                        warn!(
                            "mentor '{}' of '{}' not found in tree '{}', treating as root",
                            mentor, member.id, tree_name
                        );
                    }
                    roots.push(idx);
                }
            }
        }

        if roots.is_empty() {
            // Every member has a mentor inside the bucket: the chain must loop
            return match bucket.first() {
                Some(&idx) => Err(DomainError::CycleDetected {
                    tree: tree_name.to_string(),
                    member_id: members[idx].id.clone(),
                }),
                None => Ok(None),
            };
        }

        let depth_cap = self.depth_cap();
        let mut tree = TreeArena::new();
        let parent = if roots.len() > 1 {
            debug!("tree '{}' has {} roots, adding virtual root", tree_name, roots.len());
            let data = NodeData {
                name: tree_name.to_string(),
                attributes: NodeAttributes::virtual_root(&self.options.virtual_root_id),
            };
            Some(tree.insert_node(data, None))
        } else {
            None
        };

        // (record index, arena parent, chain depth)
        let mut stack: Vec<_> = roots.iter().rev().map(|&idx| (idx, parent, 1)).collect();

        while let Some((idx, parent_idx, depth)) = stack.pop() {
            let member = &members[idx];

            // Cycle detection
            if !self.visited.insert(idx) {
                return Err(DomainError::CycleDetected {
                    tree: tree_name.to_string(),
                    member_id: member.id.clone(),
                });
            }
            if depth > depth_cap {
                return Err(DomainError::DepthExceeded {
                    tree: tree_name.to_string(),
                    depth: depth_cap,
                });
            }

            let node_data = NodeData {
                name: member.name.clone(),
                attributes: NodeAttributes::from_member(member),
            };
            let current_idx = tree.insert_node(node_data, parent_idx);

            // Reverse push keeps mentees in input order
            if let Some(children) = self.children_cache.get(&idx) {
                for &child in children.iter().rev() {
                    stack.push((child, Some(current_idx), depth + 1));
                }
            }
        }

        // Members unreachable from any root hang off a mentor loop
        if let Some(&idx) = bucket.iter().find(|&&idx| !self.visited.contains(&idx)) {
            return Err(DomainError::CycleDetected {
                tree: tree_name.to_string(),
                member_id: members[idx].id.clone(),
            });
        }

        debug!(
            "built tree '{}' with {} nodes, depth {}",
            tree_name,
            tree.len(),
            tree.depth()
        );
        Ok(tree.into_tree_node().map(|root| LineageTree {
            name: tree_name.to_string(),
            root,
        }))
    }
}

/// Every record needs a non-blank id and name.
fn validate(members: &[MemberRecord]) -> TreeResult<()> {
    for (index, member) in members.iter().enumerate() {
        if member.id.trim().is_empty() {
            return Err(DomainError::InvalidRecord {
                index,
                reason: format!("member '{}' has no id", member.name),
            });
        }
        if member.name.trim().is_empty() {
            return Err(DomainError::InvalidRecord {
                index,
                reason: format!("member '{}' has no name", member.id),
            });
        }
    }
    Ok(())
}

/// Locale-style ordering for tree names, exact comparison as tie-break.
pub fn compare_tree_names(a: &str, b: &str) -> Ordering {
    lexical_cmp(a, b).then_with(|| a.cmp(b))
}
