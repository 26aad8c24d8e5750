use crate::core::models::User;
use crate::storage::repository::{NewUser, Page, Paged, UserFilter, UserPatch, UserRepository};
use crate::utils::error::{BlogError, Result};
use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::*;
use tracing::debug;

use super::super::entities::{self, user, user_role};
use super::types::{SeaOrmDatabase, non_blank, now};

async fn insert_role_links<C: ConnectionTrait>(
    conn: &C,
    user_id: i32,
    role_ids: &[i32],
) -> Result<()> {
    if role_ids.is_empty() {
        return Ok(());
    }

    let links = role_ids.iter().map(|&role_id| user_role::ActiveModel {
        user_id: Set(user_id),
        role_id: Set(role_id),
    });
    entities::UserRole::insert_many(links)
        .exec_without_returning(conn)
        .await
        .map_err(BlogError::Database)?;
    Ok(())
}

#[async_trait]
impl UserRepository for SeaOrmDatabase {
    async fn create(&self, new: NewUser, role_ids: &[i32]) -> Result<User> {
        debug!("Creating user: {}", new.username);

        let txn = self.db.begin().await.map_err(BlogError::Database)?;

        let now = now();
        let model = user::ActiveModel {
            username: Set(new.username),
            password_hash: Set(new.password_hash),
            email: Set(non_blank(new.email)),
            nickname: Set(non_blank(new.nickname)),
            avatar: Set(non_blank(new.avatar)),
            is_enabled: Set(new.is_enabled),
            last_login_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(BlogError::Database)?;

        insert_role_links(&txn, model.user_id, role_ids).await?;

        txn.commit().await.map_err(BlogError::Database)?;
        Ok(model.into())
    }

    async fn update(&self, user_id: i32, patch: UserPatch) -> Result<User> {
        debug!("Updating user: {}", user_id);

        let mut active: user::ActiveModel = entities::User::find_by_id(user_id)
            .one(&self.db)
            .await
            .map_err(BlogError::Database)?
            .ok_or_else(|| BlogError::not_found(format!("User {} not found", user_id)))?
            .into();

        if let Some(email) = patch.email {
            active.email = Set(non_blank(Some(email)));
        }
        if let Some(nickname) = patch.nickname {
            active.nickname = Set(non_blank(Some(nickname)));
        }
        if let Some(avatar) = patch.avatar {
            active.avatar = Set(non_blank(Some(avatar)));
        }
        active.updated_at = Set(now());

        let model = active.update(&self.db).await.map_err(BlogError::Database)?;
        Ok(model.into())
    }

    async fn find_by_id(&self, user_id: i32) -> Result<Option<User>> {
        debug!("Finding user by ID: {}", user_id);

        let model = entities::User::find_by_id(user_id)
            .one(&self.db)
            .await
            .map_err(BlogError::Database)?;

        Ok(model.map(User::from))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        debug!("Finding user by username: {}", username);

        let model = entities::User::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(BlogError::Database)?;

        Ok(model.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        debug!("Finding user by email: {}", email);

        let model = entities::User::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(BlogError::Database)?;

        Ok(model.map(User::from))
    }

    async fn list(&self, filter: UserFilter, page: Page) -> Result<Paged<User>> {
        let mut query = entities::User::find();
        if let Some(username) = filter.username.as_deref().filter(|s| !s.is_empty()) {
            query = query.filter(user::Column::Username.contains(username));
        }
        if let Some(enabled) = filter.is_enabled {
            query = query.filter(user::Column::IsEnabled.eq(enabled));
        }

        let paginator = query
            .order_by_asc(user::Column::UserId)
            .paginate(&self.db, page.page_size);

        let total = paginator.num_items().await.map_err(BlogError::Database)?;
        let models = paginator
            .fetch_page(page.page - 1)
            .await
            .map_err(BlogError::Database)?;

        Ok(Paged {
            items: models.into_iter().map(User::from).collect(),
            total,
        })
    }

    async fn set_enabled(&self, user_id: i32, enabled: bool) -> Result<()> {
        debug!("Setting user {} enabled={}", user_id, enabled);

        let result = entities::User::update_many()
            .col_expr(user::Column::IsEnabled, Expr::value(enabled))
            .col_expr(user::Column::UpdatedAt, Expr::value(now()))
            .filter(user::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(BlogError::Database)?;

        if result.rows_affected == 0 {
            return Err(BlogError::not_found(format!("User {} not found", user_id)));
        }
        Ok(())
    }

    async fn set_password_hash(&self, user_id: i32, password_hash: &str) -> Result<()> {
        debug!("Setting password hash for user: {}", user_id);

        let result = entities::User::update_many()
            .col_expr(user::Column::PasswordHash, Expr::value(password_hash))
            .col_expr(user::Column::UpdatedAt, Expr::value(now()))
            .filter(user::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(BlogError::Database)?;

        if result.rows_affected == 0 {
            return Err(BlogError::not_found(format!("User {} not found", user_id)));
        }
        Ok(())
    }

    async fn touch_last_login(&self, user_id: i32) -> Result<()> {
        debug!("Updating last login for user: {}", user_id);

        entities::User::update_many()
            .col_expr(user::Column::LastLoginAt, Expr::value(Some(now())))
            .filter(user::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(BlogError::Database)?;
        Ok(())
    }

    async fn role_ids(&self, user_id: i32) -> Result<Vec<i32>> {
        let links = entities::UserRole::find()
            .filter(user_role::Column::UserId.eq(user_id))
            .order_by_asc(user_role::Column::RoleId)
            .all(&self.db)
            .await
            .map_err(BlogError::Database)?;

        Ok(links.into_iter().map(|link| link.role_id).collect())
    }

    async fn replace_roles(&self, user_id: i32, role_ids: &[i32]) -> Result<()> {
        debug!("Replacing roles of user {}: {:?}", user_id, role_ids);

        let txn = self.db.begin().await.map_err(BlogError::Database)?;

        entities::UserRole::delete_many()
            .filter(user_role::Column::UserId.eq(user_id))
            .exec(&txn)
            .await
            .map_err(BlogError::Database)?;

        insert_role_links(&txn, user_id, role_ids).await?;

        txn.commit().await.map_err(BlogError::Database)
    }

    async fn delete(&self, user_id: i32) -> Result<()> {
        debug!("Deleting user: {}", user_id);

        let txn = self.db.begin().await.map_err(BlogError::Database)?;

        entities::UserRole::delete_many()
            .filter(user_role::Column::UserId.eq(user_id))
            .exec(&txn)
            .await
            .map_err(BlogError::Database)?;

        let result = entities::User::delete_by_id(user_id)
            .exec(&txn)
            .await
            .map_err(BlogError::Database)?;

        if result.rows_affected == 0 {
            return Err(BlogError::not_found(format!("User {} not found", user_id)));
        }

        txn.commit().await.map_err(BlogError::Database)
    }
}
