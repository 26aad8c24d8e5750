use crate::core::category_path;
use crate::core::models::{Category, SelectOption, normalize_parent};
use crate::core::tree::{TreeNode, build_tree};
use crate::storage::repository::{
    CategoryFilter, CategoryPatch, CategoryRepository, NewCategory, Page, Paged,
};
use crate::utils::error::{BlogError, Result};
use crate::utils::validation;
use std::sync::Arc;
use tracing::info;

/// Category administration
#[derive(Clone)]
pub struct CategoryService {
    categories: Arc<dyn CategoryRepository>,
}

impl CategoryService {
    pub fn new(categories: Arc<dyn CategoryRepository>) -> Self {
        Self { categories }
    }

    async fn require(&self, category_id: i32) -> Result<Category> {
        self.categories
            .find_by_id(category_id)
            .await?
            .ok_or_else(|| BlogError::not_found(format!("Category {} not found", category_id)))
    }

    async fn ensure_name_free(&self, name: &str, except: Option<i32>) -> Result<()> {
        match self.categories.find_by_name(name).await? {
            Some(existing) if Some(existing.category_id) != except => Err(BlogError::conflict(
                format!("Category name {} already exists", name),
            )),
            _ => Ok(()),
        }
    }

    async fn ensure_key_free(&self, key: &str, except: Option<i32>) -> Result<()> {
        match self.categories.find_by_key(key).await? {
            Some(existing) if Some(existing.category_id) != except => Err(BlogError::conflict(
                format!("Category key {} already exists", key),
            )),
            _ => Ok(()),
        }
    }

    async fn parent_path(&self, parent_id: i32) -> Result<String> {
        self.categories
            .find_by_id(parent_id)
            .await?
            .map(|parent| parent.path)
            .ok_or_else(|| {
                BlogError::validation(format!("Parent category {} does not exist", parent_id))
            })
    }

    pub async fn create(&self, mut new: NewCategory) -> Result<Category> {
        new.category_name = validation::required("category_name", &new.category_name)?;
        new.category_key = validation::required("category_key", &new.category_key)?;
        validation::key("category_key", &new.category_key)?;

        self.ensure_name_free(&new.category_name, None).await?;
        self.ensure_key_free(&new.category_key, None).await?;

        new.parent_id = normalize_parent(new.parent_id);
        if let Some(parent_id) = new.parent_id {
            self.parent_path(parent_id).await?;
        }

        let category = self.categories.create(new).await?;
        info!(
            category_id = category.category_id,
            path = %category.path,
            "Category created"
        );
        Ok(category)
    }

    /// Update fields; a parent change moves the whole subtree
    pub async fn update(&self, category_id: i32, mut patch: CategoryPatch) -> Result<Category> {
        let existing = self.require(category_id).await?;

        if let Some(name) = &patch.category_name {
            let name = validation::required("category_name", name)?;
            self.ensure_name_free(&name, Some(category_id)).await?;
            patch.category_name = Some(name);
        }
        if let Some(key) = &patch.category_key {
            let key = validation::required("category_key", key)?;
            validation::key("category_key", &key)?;
            self.ensure_key_free(&key, Some(category_id)).await?;
            patch.category_key = Some(key);
        }

        if let Some(parent_id) = normalize_parent(patch.parent_id) {
            let parent_path = self.parent_path(parent_id).await?;
            category_path::ensure_not_cyclic(category_id, &parent_path)?;
        }

        let category = self.categories.update(category_id, patch).await?;
        if category.path != existing.path {
            info!(
                category_id,
                from = %existing.path,
                to = %category.path,
                "Category moved"
            );
        } else {
            info!(category_id, "Category updated");
        }
        Ok(category)
    }

    pub async fn get(&self, category_id: i32) -> Result<Category> {
        self.require(category_id).await
    }

    pub async fn list(&self, filter: CategoryFilter, page: Page) -> Result<Paged<Category>> {
        self.categories.list(filter, page).await
    }

    /// Categories as a tree; hidden categories take their subtree with them
    pub async fn tree(&self, visible_only: bool) -> Result<Vec<TreeNode<Category>>> {
        let all = self.categories.list_all(visible_only).await?;
        Ok(build_tree(all))
    }

    /// Visible categories as select options, ordered like the tree
    pub async fn options(&self) -> Result<Vec<SelectOption>> {
        Ok(self
            .categories
            .list_all(true)
            .await?
            .into_iter()
            .map(|c| SelectOption {
                label: c.category_name,
                value: c.category_id,
            })
            .collect())
    }

    /// Every category below `category_id`
    pub async fn descendants(&self, category_id: i32) -> Result<Vec<Category>> {
        let category = self.require(category_id).await?;
        self.categories.find_descendants(&category.path).await
    }

    /// Whether `category_id` lies strictly below `ancestor_id`
    pub async fn is_descendant(&self, category_id: i32, ancestor_id: i32) -> Result<bool> {
        let category = self.require(category_id).await?;
        let ancestor = self.require(ancestor_id).await?;
        Ok(category_path::is_descendant(&category.path, &ancestor.path))
    }

    pub async fn delete(&self, category_id: i32) -> Result<()> {
        let existing = self.require(category_id).await?;

        if self.categories.count_children(category_id).await? > 0 {
            return Err(BlogError::conflict(
                "Category has sub-categories, move or delete them first",
            ));
        }
        if existing.article_count > 0 {
            return Err(BlogError::conflict(format!(
                "Category still holds {} article(s)",
                existing.article_count
            )));
        }

        self.categories.delete(category_id).await?;
        info!(category_id, "Category deleted");
        Ok(())
    }
}
