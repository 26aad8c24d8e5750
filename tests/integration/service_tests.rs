//! Account and role administration against a real database

#[cfg(test)]
mod tests {
    use crate::common::{TestDatabase, fixtures};
    use blog_rs::core::models::{DEFAULT_ROLE_ID, SUPER_ADMIN_ROLE_ID};
    use blog_rs::services::RoleService;
    use blog_rs::services::user::{CreateUserRequest, LoginRequest, RegisterRequest};
    use blog_rs::storage::repository::{Page, RolePatch, UserFilter};
    use blog_rs::utils::error::BlogError;

    fn register_request(username: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            password: "s3cret-pass".to_string(),
            email: Some(format!("{}@example.com", username)),
            nickname: None,
        }
    }

    /// Acting administrator id distinct from every user created here
    const ADMIN_ACTOR: i32 = 9000;

    #[tokio::test]
    async fn test_register_then_login() {
        let db = TestDatabase::new().await;
        let state = db.app_state();

        let user = state.users.register(register_request("alice")).await.unwrap();
        assert_eq!(db.users().role_ids(user.user_id).await.unwrap(), vec![DEFAULT_ROLE_ID]);

        let response = state
            .users
            .login(LoginRequest {
                username: "alice".to_string(),
                password: "s3cret-pass".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(response.user.role_keys, vec!["user".to_string()]);
        assert!(!response.user.is_admin());

        let claims = state
            .auth
            .jwt
            .verify_access_token(&response.tokens.access_token)
            .unwrap();
        assert_eq!(claims.sub, user.user_id);
        assert_eq!(claims.role_ids, vec![DEFAULT_ROLE_ID]);

        let stored = db.users().find_by_id(user.user_id).await.unwrap().unwrap();
        assert!(stored.last_login_at.is_some());
        assert_ne!(stored.password_hash, "s3cret-pass");
    }

    #[tokio::test]
    async fn test_duplicate_registration() {
        let db = TestDatabase::new().await;
        let state = db.app_state();

        state.users.register(register_request("bob")).await.unwrap();
        let again = state.users.register(register_request("bob")).await;
        assert!(matches!(again, Err(BlogError::Conflict(_))));

        let mut same_email = register_request("bobby");
        same_email.email = Some("bob@example.com".to_string());
        let again = state.users.register(same_email).await;
        assert!(matches!(again, Err(BlogError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_disabled_account_cannot_log_in_or_refresh() {
        let db = TestDatabase::new().await;
        let state = db.app_state();

        let user = state.users.register(register_request("carol")).await.unwrap();
        let login = state
            .users
            .login(LoginRequest {
                username: "carol".to_string(),
                password: "s3cret-pass".to_string(),
            })
            .await
            .unwrap();

        state.users.set_enabled(ADMIN_ACTOR, user.user_id, false).await.unwrap();

        let result = state
            .users
            .login(LoginRequest {
                username: "carol".to_string(),
                password: "s3cret-pass".to_string(),
            })
            .await;
        assert!(matches!(result, Err(BlogError::Forbidden(_))));

        let result = state.users.refresh(&login.tokens.refresh_token).await;
        assert!(matches!(result, Err(BlogError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_admin_managed_accounts() {
        let db = TestDatabase::new().await;
        let state = db.app_state();

        let editor = db.roles().create(fixtures::role("editor")).await.unwrap();
        let profile = state
            .users
            .create(CreateUserRequest {
                username: "dave".to_string(),
                password: "s3cret-pass".to_string(),
                email: None,
                nickname: Some("  Dave  ".to_string()),
                avatar: None,
                is_enabled: true,
                role_ids: vec![editor.role_id, SUPER_ADMIN_ROLE_ID, editor.role_id],
            })
            .await
            .unwrap();
        assert_eq!(profile.role_ids, vec![SUPER_ADMIN_ROLE_ID, editor.role_id]);
        assert_eq!(profile.user.nickname.as_deref(), Some("Dave"));
        assert!(state.users.is_admin(profile.user.user_id).await.unwrap());

        let assigned = state
            .users
            .assign_roles(profile.user.user_id, &[editor.role_id])
            .await
            .unwrap();
        assert_eq!(assigned, vec![editor.role_id]);
        assert!(!state.users.is_admin(profile.user.user_id).await.unwrap());

        let unknown = state.users.assign_roles(profile.user.user_id, &[4242]).await;
        assert!(matches!(unknown, Err(BlogError::Validation(_))));

        let page = state
            .users
            .list(UserFilter::default(), Page::new(1, 10))
            .await
            .unwrap();
        assert_eq!(page.total, 1);

        let own = state
            .users
            .delete(profile.user.user_id, profile.user.user_id)
            .await;
        assert!(matches!(own, Err(BlogError::BadRequest(_))));
        state.users.delete(ADMIN_ACTOR, profile.user.user_id).await.unwrap();
        assert!(db.users().role_ids(profile.user.user_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_role_administration() {
        let db = TestDatabase::new().await;
        let roles = RoleService::new(db.roles(), db.permissions());

        let reviewer = roles.create(fixtures::role("reviewer")).await.unwrap();
        let duplicate = roles.create(fixtures::role("reviewer")).await;
        assert!(matches!(duplicate, Err(BlogError::Conflict(_))));

        let perm = db
            .permissions()
            .create(fixtures::api_permission("review:api", "POST:/api/v1/reviews"))
            .await
            .unwrap();
        let assigned = roles
            .assign_permissions(reviewer.role_id, &[perm.perm_id, perm.perm_id])
            .await
            .unwrap();
        assert_eq!(assigned, vec![perm.perm_id]);
        assert_eq!(
            roles.get(reviewer.role_id).await.unwrap().permission_ids,
            vec![perm.perm_id]
        );

        let unknown = roles.assign_permissions(reviewer.role_id, &[perm.perm_id, 777]).await;
        assert!(matches!(unknown, Err(BlogError::Validation(_))));
        // the failed call left the previous set alone
        assert_eq!(roles.permission_ids(reviewer.role_id).await.unwrap(), vec![perm.perm_id]);

        let renamed = roles
            .update(
                reviewer.role_id,
                RolePatch {
                    role_name: Some("Reviewers".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(renamed.role_name, "Reviewers");

        roles.delete(reviewer.role_id).await.unwrap();
        assert!(matches!(
            roles.get(reviewer.role_id).await,
            Err(BlogError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_builtin_roles_are_protected() {
        let db = TestDatabase::new().await;
        let roles = RoleService::new(db.roles(), db.permissions());

        assert!(matches!(
            roles.set_enabled(SUPER_ADMIN_ROLE_ID, false).await,
            Err(BlogError::Forbidden(_))
        ));
        assert!(matches!(
            roles.delete(SUPER_ADMIN_ROLE_ID).await,
            Err(BlogError::Forbidden(_))
        ));
        assert!(matches!(
            roles.delete(DEFAULT_ROLE_ID).await,
            Err(BlogError::Forbidden(_))
        ));

        let role = roles.create(fixtures::role("in_use")).await.unwrap();
        let user = db.users().create(fixtures::user("erin"), &[role.role_id]).await.unwrap();
        assert!(matches!(
            roles.delete(role.role_id).await,
            Err(BlogError::Conflict(_))
        ));
        db.users().replace_roles(user.user_id, &[]).await.unwrap();
        roles.delete(role.role_id).await.unwrap();
    }
}
