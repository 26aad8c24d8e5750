//! Map-and-link tree builder
//!
//! Turns a flat, pre-sorted row set into nested nodes in linear time. The builder
//! never sorts: children keep the order in which they appear in the input.
//!
//! Rules:
//! - a node whose parent is `None` or `0` is a root
//! - a node whose parent is missing from the input is dropped with its subtree
//! - a repeated id keeps its first occurrence
//! - nodes caught in a parent cycle are never reachable from a root and are dropped

use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Anything that can be placed in a parent-linked tree
pub trait TreeItem {
    fn node_id(&self) -> i32;
    fn parent_node_id(&self) -> Option<i32>;
}

/// One node of a built tree
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeNode<T> {
    #[serde(flatten)]
    pub item: T,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode<T>>,
}

impl<T> TreeNode<T> {
    /// Number of nodes in this subtree, including itself
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(TreeNode::size).sum::<usize>()
    }
}

/// Build the forest of root nodes from a flat item list
pub fn build_tree<T: TreeItem>(items: Vec<T>) -> Vec<TreeNode<T>> {
    let mut index: HashMap<i32, usize> = HashMap::with_capacity(items.len());
    let mut slots: Vec<Option<T>> = Vec::with_capacity(items.len());

    for item in items {
        let id = item.node_id();
        if index.contains_key(&id) {
            continue;
        }
        index.insert(id, slots.len());
        slots.push(Some(item));
    }

    let mut roots = Vec::new();
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); slots.len()];

    for (idx, slot) in slots.iter().enumerate() {
        let Some(item) = slot else { continue };
        match item.parent_node_id() {
            None | Some(0) => roots.push(idx),
            Some(parent) => {
                if let Some(&parent_idx) = index.get(&parent) {
                    children[parent_idx].push(idx);
                }
            }
        }
    }

    // Preorder walk from the roots; only reachable nodes are visited.
    let mut order = Vec::with_capacity(slots.len());
    let mut stack: Vec<usize> = roots.iter().rev().copied().collect();
    while let Some(idx) = stack.pop() {
        order.push(idx);
        stack.extend(children[idx].iter().rev());
    }

    // Reverse preorder builds every child before its parent.
    let mut built: Vec<Option<TreeNode<T>>> = (0..slots.len()).map(|_| None).collect();
    for &idx in order.iter().rev() {
        let node_children = children[idx]
            .iter()
            .filter_map(|&child| built[child].take())
            .collect();
        if let Some(item) = slots[idx].take() {
            built[idx] = Some(TreeNode {
                item,
                children: node_children,
            });
        }
    }

    roots
        .into_iter()
        .filter_map(|idx| built[idx].take())
        .collect()
}

/// Whether attaching `node_id` under `new_parent_id` would close a parent cycle.
///
/// True when the new parent is the node itself or one of its descendants.
pub fn creates_cycle<T: TreeItem>(items: &[T], node_id: i32, new_parent_id: i32) -> bool {
    let parents: HashMap<i32, Option<i32>> = items
        .iter()
        .map(|item| (item.node_id(), item.parent_node_id()))
        .collect();

    let mut seen = HashSet::new();
    let mut current = Some(new_parent_id).filter(|&id| id != 0);
    while let Some(id) = current {
        if id == node_id {
            return true;
        }
        if !seen.insert(id) {
            // pre-existing loop above the new parent
            return false;
        }
        current = parents.get(&id).copied().flatten().filter(|&p| p != 0);
    }
    false
}

/// Collect the ids of every node below `root_id`
pub fn descendant_ids<T: TreeItem>(items: &[T], root_id: i32) -> Vec<i32> {
    let mut children: HashMap<i32, Vec<i32>> = HashMap::new();
    for item in items {
        if let Some(parent) = item.parent_node_id() {
            children.entry(parent).or_default().push(item.node_id());
        }
    }

    let mut seen = HashSet::from([root_id]);
    let mut result = Vec::new();
    let mut stack = vec![root_id];
    while let Some(id) = stack.pop() {
        for &child in children.get(&id).into_iter().flatten() {
            if seen.insert(child) {
                result.push(child);
                stack.push(child);
            }
        }
    }
    result
}
