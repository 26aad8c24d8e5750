//! Core data models
//!
//! Storage-independent views of the rows the services work with.

pub mod category;
pub mod permission;
pub mod role;
pub mod user;

pub use category::*;
pub use permission::*;
pub use role::*;
pub use user::*;

use serde::{Deserialize, Serialize};

/// A `{label, value}` pair for front-end select boxes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub label: String,
    pub value: i32,
}

/// Treat a zero parent reference as "no parent"
pub fn normalize_parent(parent_id: Option<i32>) -> Option<i32> {
    parent_id.filter(|&id| id != 0)
}
