//! Content category model

use super::normalize_parent;
use crate::core::tree::TreeItem;
use crate::storage::database::entities::category;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Hierarchical content grouping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub category_id: i32,
    pub parent_id: Option<i32>,
    pub category_name: String,
    pub category_key: String,
    pub path: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub sort_order: i32,
    pub is_visible: bool,
    pub article_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<category::Model> for Category {
    fn from(model: category::Model) -> Self {
        Self {
            category_id: model.category_id,
            parent_id: normalize_parent(model.parent_id),
            category_name: model.category_name,
            category_key: model.category_key,
            path: model.path,
            description: model.description,
            icon: model.icon,
            sort_order: model.sort_order,
            is_visible: model.is_visible,
            article_count: model.article_count,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

impl TreeItem for Category {
    fn node_id(&self) -> i32 {
        self.category_id
    }

    fn parent_node_id(&self) -> Option<i32> {
        self.parent_id
    }
}
