use crate::core::models::Role;
use crate::storage::repository::{NewRole, Page, Paged, RoleFilter, RolePatch, RoleRepository};
use crate::utils::error::{BlogError, Result};
use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::*;
use tracing::debug;

use super::super::entities::{self, role, role_permission, user_role};
use super::types::{SeaOrmDatabase, non_blank, now};

#[async_trait]
impl RoleRepository for SeaOrmDatabase {
    async fn create(&self, new: NewRole) -> Result<Role> {
        debug!("Creating role: {}", new.role_key);

        let now = now();
        let model = role::ActiveModel {
            role_name: Set(new.role_name),
            role_key: Set(new.role_key),
            sort_order: Set(new.sort_order),
            is_enabled: Set(new.is_enabled),
            is_builtin: Set(false),
            remark: Set(non_blank(new.remark)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(BlogError::Database)?;

        Ok(model.into())
    }

    async fn update(&self, role_id: i32, patch: RolePatch) -> Result<Role> {
        debug!("Updating role: {}", role_id);

        let mut active: role::ActiveModel = entities::Role::find_by_id(role_id)
            .one(&self.db)
            .await
            .map_err(BlogError::Database)?
            .ok_or_else(|| BlogError::not_found(format!("Role {} not found", role_id)))?
            .into();

        if let Some(name) = patch.role_name {
            active.role_name = Set(name);
        }
        if let Some(key) = patch.role_key {
            active.role_key = Set(key);
        }
        if let Some(sort_order) = patch.sort_order {
            active.sort_order = Set(sort_order);
        }
        if let Some(is_enabled) = patch.is_enabled {
            active.is_enabled = Set(is_enabled);
        }
        if let Some(remark) = patch.remark {
            active.remark = Set(non_blank(Some(remark)));
        }
        active.updated_at = Set(now());

        let model = active.update(&self.db).await.map_err(BlogError::Database)?;
        Ok(model.into())
    }

    async fn find_by_id(&self, role_id: i32) -> Result<Option<Role>> {
        debug!("Finding role by ID: {}", role_id);

        let model = entities::Role::find_by_id(role_id)
            .one(&self.db)
            .await
            .map_err(BlogError::Database)?;

        Ok(model.map(Role::from))
    }

    async fn find_by_key(&self, role_key: &str) -> Result<Option<Role>> {
        let model = entities::Role::find()
            .filter(role::Column::RoleKey.eq(role_key))
            .one(&self.db)
            .await
            .map_err(BlogError::Database)?;

        Ok(model.map(Role::from))
    }

    async fn find_by_name(&self, role_name: &str) -> Result<Option<Role>> {
        let model = entities::Role::find()
            .filter(role::Column::RoleName.eq(role_name))
            .one(&self.db)
            .await
            .map_err(BlogError::Database)?;

        Ok(model.map(Role::from))
    }

    async fn find_by_ids(&self, role_ids: &[i32]) -> Result<Vec<Role>> {
        if role_ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = entities::Role::find()
            .filter(role::Column::RoleId.is_in(role_ids.to_vec()))
            .order_by_asc(role::Column::RoleId)
            .all(&self.db)
            .await
            .map_err(BlogError::Database)?;

        Ok(models.into_iter().map(Role::from).collect())
    }

    async fn list(&self, filter: RoleFilter, page: Page) -> Result<Paged<Role>> {
        let mut query = entities::Role::find();
        if let Some(name) = filter.role_name.as_deref().filter(|s| !s.is_empty()) {
            query = query.filter(role::Column::RoleName.contains(name));
        }
        if let Some(key) = filter.role_key.as_deref().filter(|s| !s.is_empty()) {
            query = query.filter(role::Column::RoleKey.contains(key));
        }
        if let Some(enabled) = filter.is_enabled {
            query = query.filter(role::Column::IsEnabled.eq(enabled));
        }

        let paginator = query
            .order_by_asc(role::Column::SortOrder)
            .order_by_asc(role::Column::RoleId)
            .paginate(&self.db, page.page_size);

        let total = paginator.num_items().await.map_err(BlogError::Database)?;
        let models = paginator
            .fetch_page(page.page - 1)
            .await
            .map_err(BlogError::Database)?;

        Ok(Paged {
            items: models.into_iter().map(Role::from).collect(),
            total,
        })
    }

    async fn list_enabled(&self) -> Result<Vec<Role>> {
        let models = entities::Role::find()
            .filter(role::Column::IsEnabled.eq(true))
            .order_by_asc(role::Column::SortOrder)
            .order_by_asc(role::Column::RoleId)
            .all(&self.db)
            .await
            .map_err(BlogError::Database)?;

        Ok(models.into_iter().map(Role::from).collect())
    }

    async fn set_enabled(&self, role_id: i32, enabled: bool) -> Result<()> {
        debug!("Setting role {} enabled={}", role_id, enabled);

        let result = entities::Role::update_many()
            .col_expr(role::Column::IsEnabled, Expr::value(enabled))
            .col_expr(role::Column::UpdatedAt, Expr::value(now()))
            .filter(role::Column::RoleId.eq(role_id))
            .exec(&self.db)
            .await
            .map_err(BlogError::Database)?;

        if result.rows_affected == 0 {
            return Err(BlogError::not_found(format!("Role {} not found", role_id)));
        }
        Ok(())
    }

    async fn delete(&self, role_id: i32) -> Result<()> {
        debug!("Deleting role: {}", role_id);

        let txn = self.db.begin().await.map_err(BlogError::Database)?;

        entities::RolePermission::delete_many()
            .filter(role_permission::Column::RoleId.eq(role_id))
            .exec(&txn)
            .await
            .map_err(BlogError::Database)?;

        let result = entities::Role::delete_by_id(role_id)
            .exec(&txn)
            .await
            .map_err(BlogError::Database)?;

        if result.rows_affected == 0 {
            return Err(BlogError::not_found(format!("Role {} not found", role_id)));
        }

        txn.commit().await.map_err(BlogError::Database)
    }

    async fn count_users(&self, role_id: i32) -> Result<u64> {
        entities::UserRole::find()
            .filter(user_role::Column::RoleId.eq(role_id))
            .count(&self.db)
            .await
            .map_err(BlogError::Database)
    }

    async fn permission_ids(&self, role_id: i32) -> Result<Vec<i32>> {
        let links = entities::RolePermission::find()
            .filter(role_permission::Column::RoleId.eq(role_id))
            .order_by_asc(role_permission::Column::PermId)
            .all(&self.db)
            .await
            .map_err(BlogError::Database)?;

        Ok(links.into_iter().map(|link| link.perm_id).collect())
    }

    async fn replace_permissions(&self, role_id: i32, perm_ids: &[i32]) -> Result<()> {
        debug!("Replacing permissions of role {}: {:?}", role_id, perm_ids);

        let txn = self.db.begin().await.map_err(BlogError::Database)?;

        entities::RolePermission::delete_many()
            .filter(role_permission::Column::RoleId.eq(role_id))
            .exec(&txn)
            .await
            .map_err(BlogError::Database)?;

        if !perm_ids.is_empty() {
            let links = perm_ids.iter().map(|&perm_id| role_permission::ActiveModel {
                role_id: Set(role_id),
                perm_id: Set(perm_id),
            });
            entities::RolePermission::insert_many(links)
                .exec_without_returning(&txn)
                .await
                .map_err(BlogError::Database)?;
        }

        txn.commit().await.map_err(BlogError::Database)
    }
}
