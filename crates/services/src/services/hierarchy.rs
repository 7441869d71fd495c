//! Parent-pointer-to-forest conversion shared by the taxonomy screens.
//!
//! Every taxonomy in the catalog (devices, product types) is stored flat,
//! each record naming its parent by id. The admin trees, the storefront
//! dropdowns, and the drag-reorder UI all consume the same nested shape,
//! so there is exactly one builder, configured per call site instead of
//! re-implemented per screen.

use std::collections::{HashMap, hash_map::Entry};

use db::models::{category::Category, product_type::ProductType};
use serde::Serialize;
use uuid::Uuid;

/// A record that can be placed in a tree.
pub trait TreeRecord: Clone {
    fn id(&self) -> Uuid;
    fn parent_id(&self) -> Option<Uuid>;
    /// Sibling sort key; records without an explicit order sort as 0.
    fn sort_order(&self) -> i64 {
        0
    }
}

impl TreeRecord for Category {
    fn id(&self) -> Uuid {
        self.id
    }

    fn parent_id(&self) -> Option<Uuid> {
        self.parent_id
    }

    fn sort_order(&self) -> i64 {
        self.sort_order.unwrap_or(0)
    }
}

impl TreeRecord for ProductType {
    fn id(&self) -> Uuid {
        self.id
    }

    fn parent_id(&self) -> Option<Uuid> {
        self.parent_id
    }

    fn sort_order(&self) -> i64 {
        self.sort_order.unwrap_or(0)
    }
}

/// What to do with a record whose parent id does not resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrphanPolicy {
    /// Leave the record out of the forest entirely.
    Drop,
    /// Surface the record as an extra root.
    PromoteToRoot,
}

#[derive(Debug, Clone, Copy)]
pub struct HierarchyConfig {
    /// Depth at which recursion stops; roots are depth 0. Nodes at the
    /// limit keep empty `children` even when descendants exist. `None`
    /// means unbounded.
    pub max_depth: Option<usize>,
    pub orphan_policy: OrphanPolicy,
}

impl Default for HierarchyConfig {
    fn default() -> Self {
        Self {
            max_depth: None,
            orphan_policy: OrphanPolicy::Drop,
        }
    }
}

/// A record together with its ordered children.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeNode<T> {
    #[serde(flatten)]
    pub record: T,
    pub children: Vec<TreeNode<T>>,
}

/// Convert a flat record list into a forest of roots.
///
/// Single O(n) placement pass, then recursion from the roots only. A
/// record in a parent cycle (including `parent == id`) is a child of
/// another cycle member, never of a root, so it is unreachable and the
/// recursion terminates for any finite input.
pub fn build_forest<T: TreeRecord>(records: &[T], config: &HierarchyConfig) -> Vec<TreeNode<T>> {
    // First occurrence wins when an id appears twice; later duplicates are
    // skipped so every child edge points at exactly one record.
    let mut by_id: HashMap<Uuid, usize> = HashMap::with_capacity(records.len());
    let mut kept: Vec<usize> = Vec::with_capacity(records.len());
    for (idx, record) in records.iter().enumerate() {
        if let Entry::Vacant(entry) = by_id.entry(record.id()) {
            entry.insert(idx);
            kept.push(idx);
        }
    }

    let mut children_of: HashMap<Uuid, Vec<usize>> = HashMap::new();
    let mut roots: Vec<usize> = Vec::new();
    for &idx in &kept {
        match records[idx].parent_id() {
            None => roots.push(idx),
            Some(parent_id) if by_id.contains_key(&parent_id) => {
                children_of.entry(parent_id).or_default().push(idx);
            }
            Some(_) => match config.orphan_policy {
                OrphanPolicy::Drop => {}
                OrphanPolicy::PromoteToRoot => roots.push(idx),
            },
        }
    }

    assemble(records, &children_of, &roots, 0, config.max_depth)
}

fn assemble<T: TreeRecord>(
    records: &[T],
    children_of: &HashMap<Uuid, Vec<usize>>,
    indices: &[usize],
    depth: usize,
    max_depth: Option<usize>,
) -> Vec<TreeNode<T>> {
    let mut nodes: Vec<TreeNode<T>> = indices
        .iter()
        .map(|&idx| {
            let record = records[idx].clone();
            let children = if max_depth.is_none_or(|limit| depth < limit) {
                match children_of.get(&record.id()) {
                    Some(child_indices) => {
                        assemble(records, children_of, child_indices, depth + 1, max_depth)
                    }
                    None => Vec::new(),
                }
            } else {
                Vec::new()
            };
            TreeNode { record, children }
        })
        .collect();

    // Stable sort: ties keep input order, which drag-reorder relies on.
    nodes.sort_by_key(|node| node.record.sort_order());
    nodes
}
