//! RBAC integration tests
//!
//! Access checks against permissions stored through the real repositories.

#[cfg(test)]
mod tests {
    use crate::common::{TestDatabase, fixtures};
    use blog_rs::auth::rbac::{AccessDecision, RbacSystem};
    use blog_rs::core::models::PermissionType;

    /// Role bound to the given api descriptors; returns the role id
    async fn role_with_grants(db: &TestDatabase, role_key: &str, descriptors: &[&str]) -> i32 {
        let role = db.roles().create(fixtures::role(role_key)).await.unwrap();
        let mut perm_ids = Vec::new();
        for (i, descriptor) in descriptors.iter().enumerate() {
            let key = format!("{}:api:{}", role_key, i);
            let perm = db
                .permissions()
                .create(fixtures::api_permission(&key, descriptor))
                .await
                .unwrap();
            perm_ids.push(perm.perm_id);
        }
        db.roles()
            .replace_permissions(role.role_id, &perm_ids)
            .await
            .unwrap();
        role.role_id
    }

    #[tokio::test]
    async fn test_article_scenario() {
        let db = TestDatabase::new().await;
        let role_id = role_with_grants(&db, "editor", &["*:/api/v1/articles/*"]).await;
        let rbac = RbacSystem::new(db.permissions());

        assert!(
            rbac.check_permission(7, &[role_id], "/api/v1/articles/5", "DELETE")
                .await
                .unwrap()
        );
        assert!(
            !rbac
                .check_permission(7, &[role_id], "/api/v1/users/5", "DELETE")
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_seeded_user_role_passes_through_grants() {
        let db = TestDatabase::new().await;
        let perm = db
            .permissions()
            .create(fixtures::api_permission("user:list", "GET:/api/v1/users/*"))
            .await
            .unwrap();
        db.roles().replace_permissions(2, &[perm.perm_id]).await.unwrap();
        let rbac = RbacSystem::new(db.permissions());

        let decision = rbac
            .check_access(7, &[2], "/api/v1/users/42", "GET")
            .await
            .unwrap();
        assert_eq!(
            decision,
            AccessDecision::Granted {
                perm_id: perm.perm_id,
                descriptor: "GET:/api/v1/users/*".to_string(),
            }
        );
        assert!(
            !rbac
                .check_permission(7, &[2], "/api/v1/users/42", "POST")
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_exact_paths() {
        let db = TestDatabase::new().await;
        let role_id = role_with_grants(&db, "reader", &["GET:/api/v1/users"]).await;
        let rbac = RbacSystem::new(db.permissions());

        assert!(rbac.check_permission(1, &[role_id], "/api/v1/users", "get").await.unwrap());
        assert!(!rbac.check_permission(1, &[role_id], "/api/v1/users/1", "GET").await.unwrap());
    }

    #[tokio::test]
    async fn test_superuser_needs_no_grants() {
        let db = TestDatabase::new().await;
        let rbac = RbacSystem::new(db.permissions());

        let decision = rbac
            .check_access(1, &[1], "/anything/at/all", "PATCH")
            .await
            .unwrap();
        assert_eq!(decision, AccessDecision::Superuser);
    }

    #[tokio::test]
    async fn test_disabled_permission_and_role_grant_nothing() {
        let db = TestDatabase::new().await;
        let rbac = RbacSystem::new(db.permissions());

        let role_a = role_with_grants(&db, "role_a", &["GET:/a"]).await;
        let granted = db.roles().permission_ids(role_a).await.unwrap();
        db.permissions().set_enabled(granted[0], false).await.unwrap();
        assert!(!rbac.check_permission(1, &[role_a], "/a", "GET").await.unwrap());

        let role_b = role_with_grants(&db, "role_b", &["GET:/b"]).await;
        db.roles().set_enabled(role_b, false).await.unwrap();
        assert!(!rbac.check_permission(1, &[role_b], "/b", "GET").await.unwrap());
    }

    #[tokio::test]
    async fn test_non_api_permissions_are_not_candidates() {
        let db = TestDatabase::new().await;
        let role = db.roles().create(fixtures::role("menus")).await.unwrap();
        let mut menu = fixtures::permission("menu:articles", PermissionType::Menu, None);
        menu.api_path = Some("GET:/api/v1/articles".to_string());
        let menu = db.permissions().create(menu).await.unwrap();
        db.roles()
            .replace_permissions(role.role_id, &[menu.perm_id])
            .await
            .unwrap();

        let grants = db.permissions().api_grants_for_roles(&[role.role_id]).await.unwrap();
        assert!(grants.is_empty());
    }

    #[tokio::test]
    async fn test_grants_are_distinct_across_roles() {
        let db = TestDatabase::new().await;
        let perm = db
            .permissions()
            .create(fixtures::api_permission("shared", "GET:/shared"))
            .await
            .unwrap();
        let a = db.roles().create(fixtures::role("a_role")).await.unwrap();
        let b = db.roles().create(fixtures::role("b_role")).await.unwrap();
        db.roles().replace_permissions(a.role_id, &[perm.perm_id]).await.unwrap();
        db.roles().replace_permissions(b.role_id, &[perm.perm_id]).await.unwrap();

        let grants = db
            .permissions()
            .api_grants_for_roles(&[a.role_id, b.role_id])
            .await
            .unwrap();
        assert_eq!(grants.len(), 1);
    }
}
