use crate::core::models::{ApiGrant, Permission, PermissionType, normalize_parent};
use crate::storage::repository::{
    NewPermission, Page, Paged, PermissionFilter, PermissionPatch, PermissionRepository,
};
use crate::utils::error::{BlogError, Result};
use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::*;
use tracing::debug;

use super::super::entities::{self, permission, role, role_permission};
use super::types::{SeaOrmDatabase, non_blank, now};

fn to_domain(models: Vec<permission::Model>) -> Result<Vec<Permission>> {
    models.into_iter().map(Permission::try_from).collect()
}

fn apply_patch(active: &mut permission::ActiveModel, patch: PermissionPatch) {
    if let Some(name) = patch.perm_name {
        active.perm_name = Set(name);
    }
    if let Some(key) = patch.perm_key {
        active.perm_key = Set(key);
    }
    if let Some(perm_type) = patch.perm_type {
        active.perm_type = Set(perm_type.code());
    }
    if let Some(parent_id) = patch.parent_id {
        active.parent_id = Set(normalize_parent(Some(parent_id)));
    }
    if let Some(path) = patch.path {
        active.path = Set(non_blank(Some(path)));
    }
    if let Some(component) = patch.component {
        active.component = Set(non_blank(Some(component)));
    }
    if let Some(icon) = patch.icon {
        active.icon = Set(non_blank(Some(icon)));
    }
    if let Some(api_path) = patch.api_path {
        active.api_path = Set(non_blank(Some(api_path)));
    }
    if let Some(sort_order) = patch.sort_order {
        active.sort_order = Set(sort_order);
    }
    if let Some(is_visible) = patch.is_visible {
        active.is_visible = Set(is_visible);
    }
    if let Some(is_enabled) = patch.is_enabled {
        active.is_enabled = Set(is_enabled);
    }
    if let Some(remark) = patch.remark {
        active.remark = Set(non_blank(Some(remark)));
    }
}

impl SeaOrmDatabase {
    /// Enabled permissions bound to at least one enabled role in `role_ids`
    fn granted_permissions(role_ids: &[i32]) -> Select<entities::Permission> {
        entities::Permission::find()
            .join(JoinType::InnerJoin, permission::Relation::RolePermission.def())
            .join(JoinType::InnerJoin, role_permission::Relation::Role.def())
            .filter(role_permission::Column::RoleId.is_in(role_ids.to_vec()))
            .filter(role::Column::IsEnabled.eq(true))
            .filter(permission::Column::IsEnabled.eq(true))
            .distinct()
    }
}

#[async_trait]
impl PermissionRepository for SeaOrmDatabase {
    async fn create(&self, new: NewPermission) -> Result<Permission> {
        debug!("Creating permission: {}", new.perm_key);

        let now = now();
        let model = permission::ActiveModel {
            perm_name: Set(new.perm_name),
            perm_key: Set(new.perm_key),
            perm_type: Set(new.perm_type.code()),
            parent_id: Set(normalize_parent(new.parent_id)),
            path: Set(non_blank(new.path)),
            component: Set(non_blank(new.component)),
            icon: Set(non_blank(new.icon)),
            api_path: Set(non_blank(new.api_path)),
            sort_order: Set(new.sort_order),
            is_visible: Set(new.is_visible),
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

        Permission::try_from(model)
    }

    async fn update(&self, perm_id: i32, patch: PermissionPatch) -> Result<Permission> {
        debug!("Updating permission: {}", perm_id);

        let mut active: permission::ActiveModel = entities::Permission::find_by_id(perm_id)
            .one(&self.db)
            .await
            .map_err(BlogError::Database)?
            .ok_or_else(|| BlogError::not_found(format!("Permission {} not found", perm_id)))?
            .into();

        apply_patch(&mut active, patch);
        active.updated_at = Set(now());

        let model = active.update(&self.db).await.map_err(BlogError::Database)?;
        Permission::try_from(model)
    }

    async fn find_by_id(&self, perm_id: i32) -> Result<Option<Permission>> {
        debug!("Finding permission by ID: {}", perm_id);

        entities::Permission::find_by_id(perm_id)
            .one(&self.db)
            .await
            .map_err(BlogError::Database)?
            .map(Permission::try_from)
            .transpose()
    }

    async fn find_by_key(&self, perm_key: &str) -> Result<Option<Permission>> {
        entities::Permission::find()
            .filter(permission::Column::PermKey.eq(perm_key))
            .one(&self.db)
            .await
            .map_err(BlogError::Database)?
            .map(Permission::try_from)
            .transpose()
    }

    async fn find_api_by_descriptor(&self, descriptor: &str) -> Result<Option<Permission>> {
        entities::Permission::find()
            .filter(permission::Column::PermType.eq(PermissionType::Api.code()))
            .filter(permission::Column::ApiPath.eq(descriptor))
            .one(&self.db)
            .await
            .map_err(BlogError::Database)?
            .map(Permission::try_from)
            .transpose()
    }

    async fn find_by_ids(&self, perm_ids: &[i32]) -> Result<Vec<Permission>> {
        if perm_ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = entities::Permission::find()
            .filter(permission::Column::PermId.is_in(perm_ids.to_vec()))
            .order_by_asc(permission::Column::PermId)
            .all(&self.db)
            .await
            .map_err(BlogError::Database)?;

        to_domain(models)
    }

    async fn list(&self, filter: PermissionFilter, page: Page) -> Result<Paged<Permission>> {
        debug!("Listing permissions: {:?}, {:?}", filter, page);

        let mut query = entities::Permission::find();
        if let Some(name) = filter.perm_name.as_deref().filter(|s| !s.is_empty()) {
            query = query.filter(permission::Column::PermName.contains(name));
        }
        if let Some(key) = filter.perm_key.as_deref().filter(|s| !s.is_empty()) {
            query = query.filter(permission::Column::PermKey.contains(key));
        }
        if let Some(perm_type) = filter.perm_type {
            query = query.filter(permission::Column::PermType.eq(perm_type.code()));
        }
        if let Some(parent_id) = filter.parent_id {
            query = match normalize_parent(Some(parent_id)) {
                Some(id) => query.filter(permission::Column::ParentId.eq(id)),
                None => query.filter(permission::Column::ParentId.is_null()),
            };
        }
        if let Some(enabled) = filter.is_enabled {
            query = query.filter(permission::Column::IsEnabled.eq(enabled));
        }

        let paginator = query
            .order_by_asc(permission::Column::SortOrder)
            .order_by_asc(permission::Column::PermId)
            .paginate(&self.db, page.page_size);

        let total = paginator.num_items().await.map_err(BlogError::Database)?;
        let models = paginator
            .fetch_page(page.page - 1)
            .await
            .map_err(BlogError::Database)?;

        Ok(Paged {
            items: to_domain(models)?,
            total,
        })
    }

    async fn list_all(&self, enabled_only: bool) -> Result<Vec<Permission>> {
        let mut query = entities::Permission::find();
        if enabled_only {
            query = query.filter(permission::Column::IsEnabled.eq(true));
        }

        let models = query
            .order_by_asc(permission::Column::SortOrder)
            .order_by_asc(permission::Column::PermId)
            .all(&self.db)
            .await
            .map_err(BlogError::Database)?;

        to_domain(models)
    }

    async fn list_for_roles(
        &self,
        role_ids: &[i32],
        types: &[PermissionType],
    ) -> Result<Vec<Permission>> {
        if role_ids.is_empty() || types.is_empty() {
            return Ok(Vec::new());
        }

        let codes: Vec<i32> = types.iter().map(|t| t.code()).collect();
        let models = Self::granted_permissions(role_ids)
            .filter(permission::Column::PermType.is_in(codes))
            .order_by_asc(permission::Column::SortOrder)
            .order_by_asc(permission::Column::PermId)
            .all(&self.db)
            .await
            .map_err(BlogError::Database)?;

        to_domain(models)
    }

    async fn api_grants_for_roles(&self, role_ids: &[i32]) -> Result<Vec<ApiGrant>> {
        if role_ids.is_empty() {
            return Ok(Vec::new());
        }

        debug!("Fetching api grants for roles {:?}", role_ids);

        let models = Self::granted_permissions(role_ids)
            .filter(permission::Column::PermType.eq(PermissionType::Api.code()))
            .filter(permission::Column::ApiPath.is_not_null())
            .filter(permission::Column::ApiPath.ne(""))
            .order_by_asc(permission::Column::PermId)
            .all(&self.db)
            .await
            .map_err(BlogError::Database)?;

        Ok(models
            .into_iter()
            .filter_map(|model| {
                model.api_path.map(|access_descriptor| ApiGrant {
                    perm_id: model.perm_id,
                    access_descriptor,
                })
            })
            .collect())
    }

    async fn count_children(&self, perm_id: i32) -> Result<u64> {
        entities::Permission::find()
            .filter(permission::Column::ParentId.eq(perm_id))
            .count(&self.db)
            .await
            .map_err(BlogError::Database)
    }

    async fn count_role_bindings(&self, perm_id: i32) -> Result<u64> {
        entities::RolePermission::find()
            .filter(role_permission::Column::PermId.eq(perm_id))
            .count(&self.db)
            .await
            .map_err(BlogError::Database)
    }

    async fn set_enabled(&self, perm_id: i32, enabled: bool) -> Result<()> {
        debug!("Setting permission {} enabled={}", perm_id, enabled);

        let result = entities::Permission::update_many()
            .col_expr(permission::Column::IsEnabled, Expr::value(enabled))
            .col_expr(permission::Column::UpdatedAt, Expr::value(now()))
            .filter(permission::Column::PermId.eq(perm_id))
            .exec(&self.db)
            .await
            .map_err(BlogError::Database)?;

        if result.rows_affected == 0 {
            return Err(BlogError::not_found(format!("Permission {} not found", perm_id)));
        }
        Ok(())
    }

    async fn delete(&self, perm_id: i32) -> Result<()> {
        debug!("Deleting permission: {}", perm_id);

        let txn = self.db.begin().await.map_err(BlogError::Database)?;

        entities::RolePermission::delete_many()
            .filter(role_permission::Column::PermId.eq(perm_id))
            .exec(&txn)
            .await
            .map_err(BlogError::Database)?;

        let result = entities::Permission::delete_by_id(perm_id)
            .exec(&txn)
            .await
            .map_err(BlogError::Database)?;

        if result.rows_affected == 0 {
            return Err(BlogError::not_found(format!("Permission {} not found", perm_id)));
        }

        txn.commit().await.map_err(BlogError::Database)
    }
}
