//! Materialized category paths
//!
//! A path is the `/`-joined chain of ancestor ids ending in the category's own id.
//! A root's path is its own id, so `1/4/9` is category 9 under 4 under root 1.

use crate::utils::error::{BlogError, Result};

/// Separator between ids in a materialized path
pub const PATH_SEPARATOR: char = '/';

/// Path of a category without a parent
pub fn root_path(id: i32) -> String {
    id.to_string()
}

/// Path of a category placed under a parent with `parent_path`
pub fn child_path(parent_path: &str, id: i32) -> String {
    format!("{}{}{}", parent_path, PATH_SEPARATOR, id)
}

/// Path for `id` given the parent's stored path, if any
pub fn materialize(id: i32, parent_path: Option<&str>) -> String {
    match parent_path {
        Some(parent) => child_path(parent, id),
        None => root_path(id),
    }
}

/// Parse a path into its ids, root first
pub fn segments(path: &str) -> Result<Vec<i32>> {
    path.split(PATH_SEPARATOR)
        .map(|segment| {
            segment
                .parse::<i32>()
                .map_err(|_| BlogError::internal(format!("Malformed category path: {:?}", path)))
        })
        .collect()
}

/// Number of ancestors above the node
pub fn depth(path: &str) -> usize {
    path.matches(PATH_SEPARATOR).count()
}

/// Whether `path` lies strictly below `ancestor_path`
pub fn is_descendant(path: &str, ancestor_path: &str) -> bool {
    path.len() > ancestor_path.len()
        && path.starts_with(ancestor_path)
        && path[ancestor_path.len()..].starts_with(PATH_SEPARATOR)
}

/// Whether `path` runs through the node with `id`
pub fn contains_id(path: &str, id: i32) -> bool {
    let needle = id.to_string();
    path.split(PATH_SEPARATOR).any(|segment| segment == needle)
}

/// Reject moving `node_id` under a parent whose path already runs through it
pub fn ensure_not_cyclic(node_id: i32, new_parent_path: &str) -> Result<()> {
    if contains_id(new_parent_path, node_id) {
        return Err(BlogError::validation(format!(
            "Category {} cannot be moved under itself or one of its descendants",
            node_id
        )));
    }
    Ok(())
}

/// Replace the `old_prefix` of `path` with `new_prefix`.
///
/// Returns `None` when `path` is neither `old_prefix` nor below it.
pub fn rebase(path: &str, old_prefix: &str, new_prefix: &str) -> Option<String> {
    if path == old_prefix {
        return Some(new_prefix.to_string());
    }
    if is_descendant(path, old_prefix) {
        return Some(format!("{}{}", new_prefix, &path[old_prefix.len()..]));
    }
    None
}

/// `LIKE` pattern matching every path strictly below `path`
pub fn descendant_like_pattern(path: &str) -> String {
    format!("{}{}%", path, PATH_SEPARATOR)
}
