use crate::core::category_path;
use crate::core::models::{Category, normalize_parent};
use crate::storage::repository::{
    CategoryFilter, CategoryPatch, CategoryRepository, NewCategory, Page, Paged,
};
use crate::utils::error::{BlogError, Result};
use async_trait::async_trait;
use sea_orm::*;
use tracing::debug;

use super::super::entities::{self, category};
use super::types::{SeaOrmDatabase, non_blank, now};

/// Stored path of the parent a write refers to, read inside the write's transaction
async fn load_parent_path<C: ConnectionTrait>(conn: &C, parent_id: i32) -> Result<String> {
    entities::Category::find_by_id(parent_id)
        .one(conn)
        .await
        .map_err(BlogError::Database)?
        .map(|parent| parent.path)
        .ok_or_else(|| {
            BlogError::validation(format!("Parent category {} does not exist", parent_id))
        })
}

/// Rewrite the prefix of every path below `old_path`
async fn rebase_descendants<C: ConnectionTrait>(
    conn: &C,
    old_path: &str,
    new_path: &str,
) -> Result<usize> {
    let descendants = entities::Category::find()
        .filter(category::Column::Path.like(category_path::descendant_like_pattern(old_path)))
        .all(conn)
        .await
        .map_err(BlogError::Database)?;

    let now = now();
    let mut rewritten = 0;
    for model in descendants {
        let Some(path) = category_path::rebase(&model.path, old_path, new_path) else {
            continue;
        };
        let mut active: category::ActiveModel = model.into();
        active.path = Set(path);
        active.updated_at = Set(now);
        active.update(conn).await.map_err(BlogError::Database)?;
        rewritten += 1;
    }
    Ok(rewritten)
}

#[async_trait]
impl CategoryRepository for SeaOrmDatabase {
    async fn create(&self, new: NewCategory) -> Result<Category> {
        debug!("Creating category: {}", new.category_key);

        let txn = self.db.begin().await.map_err(BlogError::Database)?;

        let parent_id = normalize_parent(new.parent_id);
        let parent_path = match parent_id {
            Some(id) => Some(load_parent_path(&txn, id).await?),
            None => None,
        };

        let now = now();
        let model = category::ActiveModel {
            parent_id: Set(parent_id),
            category_name: Set(new.category_name),
            category_key: Set(new.category_key),
            path: Set(String::new()),
            description: Set(non_blank(new.description)),
            icon: Set(non_blank(new.icon)),
            sort_order: Set(new.sort_order),
            is_visible: Set(new.is_visible),
            article_count: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(BlogError::Database)?;

        // the own id is only known after the insert
        let path = category_path::materialize(model.category_id, parent_path.as_deref());
        let mut active: category::ActiveModel = model.into();
        active.path = Set(path);
        let model = active.update(&txn).await.map_err(BlogError::Database)?;

        txn.commit().await.map_err(BlogError::Database)?;
        Ok(model.into())
    }

    async fn update(&self, category_id: i32, patch: CategoryPatch) -> Result<Category> {
        debug!("Updating category: {}", category_id);

        let txn = self.db.begin().await.map_err(BlogError::Database)?;

        let model = entities::Category::find_by_id(category_id)
            .one(&txn)
            .await
            .map_err(BlogError::Database)?
            .ok_or_else(|| BlogError::not_found(format!("Category {} not found", category_id)))?;

        let old_path = model.path.clone();
        let mut active: category::ActiveModel = model.into();

        if let Some(name) = patch.category_name {
            active.category_name = Set(name);
        }
        if let Some(key) = patch.category_key {
            active.category_key = Set(key);
        }
        if let Some(description) = patch.description {
            active.description = Set(non_blank(Some(description)));
        }
        if let Some(icon) = patch.icon {
            active.icon = Set(non_blank(Some(icon)));
        }
        if let Some(sort_order) = patch.sort_order {
            active.sort_order = Set(sort_order);
        }
        if let Some(is_visible) = patch.is_visible {
            active.is_visible = Set(is_visible);
        }

        if let Some(requested) = patch.parent_id {
            let new_parent = normalize_parent(Some(requested));
            let new_path = match new_parent {
                Some(parent_id) => {
                    let parent_path = load_parent_path(&txn, parent_id).await?;
                    category_path::ensure_not_cyclic(category_id, &parent_path)?;
                    category_path::child_path(&parent_path, category_id)
                }
                None => category_path::root_path(category_id),
            };

            active.parent_id = Set(new_parent);
            if new_path != old_path {
                let rewritten = rebase_descendants(&txn, &old_path, &new_path).await?;
                debug!(
                    "Category {} moved from {} to {}, {} descendants rewritten",
                    category_id, old_path, new_path, rewritten
                );
                active.path = Set(new_path);
            }
        }

        active.updated_at = Set(now());
        let model = active.update(&txn).await.map_err(BlogError::Database)?;

        txn.commit().await.map_err(BlogError::Database)?;
        Ok(model.into())
    }

    async fn find_by_id(&self, category_id: i32) -> Result<Option<Category>> {
        debug!("Finding category by ID: {}", category_id);

        let model = entities::Category::find_by_id(category_id)
            .one(&self.db)
            .await
            .map_err(BlogError::Database)?;

        Ok(model.map(Category::from))
    }

    async fn find_by_key(&self, category_key: &str) -> Result<Option<Category>> {
        let model = entities::Category::find()
            .filter(category::Column::CategoryKey.eq(category_key))
            .one(&self.db)
            .await
            .map_err(BlogError::Database)?;

        Ok(model.map(Category::from))
    }

    async fn find_by_name(&self, category_name: &str) -> Result<Option<Category>> {
        let model = entities::Category::find()
            .filter(category::Column::CategoryName.eq(category_name))
            .one(&self.db)
            .await
            .map_err(BlogError::Database)?;

        Ok(model.map(Category::from))
    }

    async fn list(&self, filter: CategoryFilter, page: Page) -> Result<Paged<Category>> {
        let mut query = entities::Category::find();
        if let Some(name) = filter.category_name.as_deref().filter(|s| !s.is_empty()) {
            query = query.filter(category::Column::CategoryName.contains(name));
        }
        if let Some(parent_id) = filter.parent_id {
            query = match normalize_parent(Some(parent_id)) {
                Some(id) => query.filter(category::Column::ParentId.eq(id)),
                None => query.filter(category::Column::ParentId.is_null()),
            };
        }
        if let Some(visible) = filter.is_visible {
            query = query.filter(category::Column::IsVisible.eq(visible));
        }

        let paginator = query
            .order_by_asc(category::Column::SortOrder)
            .order_by_asc(category::Column::CategoryId)
            .paginate(&self.db, page.page_size);

        let total = paginator.num_items().await.map_err(BlogError::Database)?;
        let models = paginator
            .fetch_page(page.page - 1)
            .await
            .map_err(BlogError::Database)?;

        Ok(Paged {
            items: models.into_iter().map(Category::from).collect(),
            total,
        })
    }

    async fn list_all(&self, visible_only: bool) -> Result<Vec<Category>> {
        let mut query = entities::Category::find();
        if visible_only {
            query = query.filter(category::Column::IsVisible.eq(true));
        }

        let models = query
            .order_by_asc(category::Column::SortOrder)
            .order_by_asc(category::Column::CategoryId)
            .all(&self.db)
            .await
            .map_err(BlogError::Database)?;

        Ok(models.into_iter().map(Category::from).collect())
    }

    async fn find_descendants(&self, path: &str) -> Result<Vec<Category>> {
        let models = entities::Category::find()
            .filter(category::Column::Path.like(category_path::descendant_like_pattern(path)))
            .order_by_asc(category::Column::Path)
            .all(&self.db)
            .await
            .map_err(BlogError::Database)?;

        Ok(models.into_iter().map(Category::from).collect())
    }

    async fn count_children(&self, category_id: i32) -> Result<u64> {
        entities::Category::find()
            .filter(category::Column::ParentId.eq(category_id))
            .count(&self.db)
            .await
            .map_err(BlogError::Database)
    }

    async fn delete(&self, category_id: i32) -> Result<()> {
        debug!("Deleting category: {}", category_id);

        let result = entities::Category::delete_by_id(category_id)
            .exec(&self.db)
            .await
            .map_err(BlogError::Database)?;

        if result.rows_affected == 0 {
            return Err(BlogError::not_found(format!(
                "Category {} not found",
                category_id
            )));
        }
        Ok(())
    }
}
