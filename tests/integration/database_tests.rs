//! Database integration tests
//!
//! Tests repository operations using real in-memory SQLite database.

#[cfg(test)]
mod tests {
    use crate::common::{TestDatabase, fixtures, test_db_config};
    use crate::{assert_err, assert_ok};
    use blog_rs::core::models::PermissionType;
    use blog_rs::storage::database::{Database, DatabaseBackendType};
    use blog_rs::storage::repository::{
        CategoryFilter, Page, PermissionFilter, RoleFilter, RolePatch, UserFilter, UserPatch,
    };
    use blog_rs::utils::error::BlogError;

    /// Test basic database connection and health check
    #[tokio::test]
    async fn test_database_health_check() {
        let db = Database::new(&test_db_config()).await;
        assert!(db.is_ok(), "Failed to create database: {:?}", db.err());

        let db = db.unwrap();
        assert_eq!(db.backend_type(), DatabaseBackendType::SQLite);

        let migrate_result = db.migrate().await;
        assert!(
            migrate_result.is_ok(),
            "Migration failed: {:?}",
            migrate_result.err()
        );

        let health = db.health_check().await;
        assert!(health.is_ok(), "Health check failed: {:?}", health.err());
    }

    /// Built-in roles exist right after migration
    #[tokio::test]
    async fn test_builtin_roles_seeded() {
        let db = TestDatabase::new().await;

        let admin = db.roles().find_by_id(1).await.unwrap().unwrap();
        assert_eq!(admin.role_key, "admin");
        assert!(admin.is_builtin);
        assert!(admin.is_super_admin());

        let user = db.roles().find_by_key("user").await.unwrap().unwrap();
        assert_eq!(user.role_id, 2);
        assert!(user.is_enabled);

        // fresh rows continue after the seeded ids
        let custom = db.roles().create(fixtures::role("custom")).await.unwrap();
        assert!(custom.role_id > 2);
        assert!(!custom.is_builtin);
    }

    #[tokio::test]
    async fn test_user_operations() {
        let db = TestDatabase::new().await;
        let users = db.users();

        let created = users.create(fixtures::user("frank"), &[2]).await.unwrap();
        assert!(created.is_enabled);
        assert!(created.last_login_at.is_none());

        let by_name = users.find_by_username("frank").await.unwrap();
        assert_eq!(by_name.map(|u| u.user_id), Some(created.user_id));
        let by_email = users.find_by_email("frank@example.com").await.unwrap();
        assert_eq!(by_email.map(|u| u.user_id), Some(created.user_id));
        assert!(users.find_by_username("nobody").await.unwrap().is_none());

        let updated = users
            .update(
                created.user_id,
                UserPatch {
                    nickname: Some("Frankie".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.nickname.as_deref(), Some("Frankie"));
        assert_eq!(updated.email.as_deref(), Some("frank@example.com"));

        users.touch_last_login(created.user_id).await.unwrap();
        let touched = users.find_by_id(created.user_id).await.unwrap().unwrap();
        assert!(touched.last_login_at.is_some());

        users.replace_roles(created.user_id, &[2, 1]).await.unwrap();
        assert_eq!(users.role_ids(created.user_id).await.unwrap(), vec![1, 2]);

        users.delete(created.user_id).await.unwrap();
        assert!(users.find_by_id(created.user_id).await.unwrap().is_none());
        assert_eq!(db.roles().count_users(1).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_missing_rows() {
        let db = TestDatabase::new().await;

        let err = assert_err!(db.users().set_enabled(404, false).await);
        assert!(matches!(err, BlogError::NotFound(_)));
        let err = assert_err!(db.permissions().set_enabled(404, false).await);
        assert!(matches!(err, BlogError::NotFound(_)));
        let err = assert_err!(db.roles().update(404, RolePatch::default()).await);
        assert!(matches!(err, BlogError::NotFound(_)));

        let missing = assert_ok!(db.categories().find_by_key("missing").await);
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_set_password_hash() {
        let db = TestDatabase::new().await;
        let user = assert_ok!(db.users().create(fixtures::user("judy"), &[2]).await);

        assert_ok!(db.users().set_password_hash(user.user_id, "$argon2id$replaced").await);
        let stored = assert_ok!(db.users().find_by_id(user.user_id).await).unwrap();
        assert_eq!(stored.password_hash, "$argon2id$replaced");

        let err = assert_err!(db.users().set_password_hash(404, "x").await);
        assert!(matches!(err, BlogError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_filters_and_paging() {
        let db = TestDatabase::new().await;

        for name in ["writer_one", "writer_two", "reader"] {
            db.users().create(fixtures::user(name), &[]).await.unwrap();
        }

        let page = db
            .users()
            .list(
                UserFilter {
                    username: Some("writer".to_string()),
                    ..Default::default()
                },
                Page::new(1, 1),
            )
            .await
            .unwrap();
        assert_eq!(page.total, 2);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].username, "writer_one");

        let second = db
            .users()
            .list(
                UserFilter {
                    username: Some("writer".to_string()),
                    ..Default::default()
                },
                Page::new(2, 1),
            )
            .await
            .unwrap();
        assert_eq!(second.items[0].username, "writer_two");

        let roles = db
            .roles()
            .list(
                RoleFilter {
                    is_enabled: Some(true),
                    ..Default::default()
                },
                Page::default(),
            )
            .await
            .unwrap();
        assert_eq!(roles.total, 2);

        let menu = db.permissions().create(fixtures::menu("menu", None)).await.unwrap();
        db.permissions()
            .create(fixtures::permission("menu:btn", PermissionType::Button, Some(menu.perm_id)))
            .await
            .unwrap();
        let buttons = db
            .permissions()
            .list(
                PermissionFilter {
                    perm_type: Some(PermissionType::Button),
                    ..Default::default()
                },
                Page::default(),
            )
            .await
            .unwrap();
        assert_eq!(buttons.total, 1);
        let roots = db
            .permissions()
            .list(
                PermissionFilter {
                    parent_id: Some(0),
                    ..Default::default()
                },
                Page::default(),
            )
            .await
            .unwrap();
        assert_eq!(roots.items.iter().map(|p| p.perm_id).collect::<Vec<_>>(), vec![menu.perm_id]);

        let root = db.categories().create(fixtures::category("root", None)).await.unwrap();
        db.categories()
            .create(fixtures::category("leaf", Some(root.category_id)))
            .await
            .unwrap();
        let children = db
            .categories()
            .list(
                CategoryFilter {
                    parent_id: Some(root.category_id),
                    ..Default::default()
                },
                Page::default(),
            )
            .await
            .unwrap();
        assert_eq!(children.total, 1);
        assert_eq!(children.items[0].category_key, "leaf");
    }

    #[tokio::test]
    async fn test_permission_delete_removes_bindings() {
        let db = TestDatabase::new().await;

        let perm = db
            .permissions()
            .create(fixtures::api_permission("temp", "GET:/temp"))
            .await
            .unwrap();
        db.roles().replace_permissions(2, &[perm.perm_id]).await.unwrap();
        assert_eq!(db.permissions().count_role_bindings(perm.perm_id).await.unwrap(), 1);

        db.permissions().delete(perm.perm_id).await.unwrap();
        assert!(db.roles().permission_ids(2).await.unwrap().is_empty());
        assert!(
            db.permissions()
                .find_api_by_descriptor("GET:/temp")
                .await
                .unwrap()
                .is_none()
        );
    }
}
