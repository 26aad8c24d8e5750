//! Core domain logic
//!
//! Domain types plus the two pieces of hierarchy logic shared by permissions and
//! categories: the map-and-link tree builder and the materialized category path.

pub mod category_path;
pub mod models;
pub mod tree;
