//! Permission tree integration tests

#[cfg(test)]
mod tests {
    use crate::common::{TestDatabase, fixtures};
    use blog_rs::core::models::{Permission, PermissionType, SUPER_ADMIN_ROLE_ID};
    use blog_rs::core::tree::TreeNode;
    use blog_rs::services::PermissionService;
    use blog_rs::storage::repository::PermissionPatch;
    use blog_rs::utils::error::BlogError;

    fn keys(nodes: &[TreeNode<Permission>]) -> Vec<&str> {
        nodes.iter().map(|n| n.item.perm_key.as_str()).collect()
    }

    #[tokio::test]
    async fn test_tree_from_stored_rows() {
        let db = TestDatabase::new().await;
        let service = PermissionService::new(db.permissions());

        let system = service.create(fixtures::menu("system", None)).await.unwrap();
        let users = service
            .create(fixtures::menu("system:user", Some(system.perm_id)))
            .await
            .unwrap();
        let mut add = fixtures::permission("system:user:add", PermissionType::Button, Some(users.perm_id));
        add.sort_order = 2;
        service.create(add).await.unwrap();
        let mut list = fixtures::permission("system:user:list", PermissionType::Button, Some(users.perm_id));
        list.sort_order = 1;
        service.create(list).await.unwrap();
        service.create(fixtures::menu("content", Some(0))).await.unwrap();

        let tree = service.tree().await.unwrap();
        assert_eq!(keys(&tree), vec!["system", "content"]);
        assert_eq!(tree[0].size(), 4);
        let buttons = &tree[0].children[0].children;
        assert_eq!(keys(buttons), vec!["system:user:list", "system:user:add"]);
    }

    #[tokio::test]
    async fn test_orphaned_rows_are_dropped() {
        let db = TestDatabase::new().await;
        let service = PermissionService::new(db.permissions());

        let parent = service.create(fixtures::menu("parent", None)).await.unwrap();
        let child = service
            .create(fixtures::menu("child", Some(parent.perm_id)))
            .await
            .unwrap();
        // bypass the service so the dangling parent survives
        db.permissions()
            .update(
                child.perm_id,
                PermissionPatch {
                    parent_id: Some(9999),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let tree = service.tree().await.unwrap();
        assert_eq!(keys(&tree), vec!["parent"]);
        assert!(tree[0].children.is_empty());
    }

    #[tokio::test]
    async fn test_reparent_into_own_subtree_is_rejected() {
        let db = TestDatabase::new().await;
        let service = PermissionService::new(db.permissions());

        let a = service.create(fixtures::menu("a", None)).await.unwrap();
        let b = service.create(fixtures::menu("a:b", Some(a.perm_id))).await.unwrap();

        let result = service
            .update(
                a.perm_id,
                PermissionPatch {
                    parent_id: Some(b.perm_id),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(BlogError::Validation(_))));

        let moved = service
            .update(
                b.perm_id,
                PermissionPatch {
                    parent_id: Some(0),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(moved.parent_id, None);
    }

    #[tokio::test]
    async fn test_menu_tree_follows_role_grants() {
        let db = TestDatabase::new().await;
        let service = PermissionService::new(db.permissions());

        let content = service.create(fixtures::menu("content", None)).await.unwrap();
        let articles = service
            .create(fixtures::menu("content:article", Some(content.perm_id)))
            .await
            .unwrap();
        let system = service.create(fixtures::menu("system", None)).await.unwrap();
        service
            .create(fixtures::api_permission("article:api", "GET:/api/v1/articles"))
            .await
            .unwrap();

        let role = db.roles().create(fixtures::role("writer")).await.unwrap();
        db.roles()
            .replace_permissions(role.role_id, &[content.perm_id, articles.perm_id])
            .await
            .unwrap();

        let writer_tree = service.menu_tree_for_roles(&[role.role_id]).await.unwrap();
        assert_eq!(keys(&writer_tree), vec!["content"]);
        assert_eq!(keys(&writer_tree[0].children), vec!["content:article"]);

        let admin_tree = service
            .menu_tree_for_roles(&[SUPER_ADMIN_ROLE_ID])
            .await
            .unwrap();
        let admin_keys = keys(&admin_tree);
        assert!(admin_keys.contains(&"content"));
        assert!(admin_keys.contains(&system.perm_key.as_str()));
        assert!(!admin_keys.contains(&"article:api"));

        assert!(service.menu_tree_for_roles(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_guards() {
        let db = TestDatabase::new().await;
        let service = PermissionService::new(db.permissions());

        let parent = service.create(fixtures::menu("guarded", None)).await.unwrap();
        let child = service
            .create(fixtures::menu("guarded:child", Some(parent.perm_id)))
            .await
            .unwrap();
        db.roles()
            .replace_permissions(2, &[child.perm_id])
            .await
            .unwrap();

        assert!(matches!(
            service.delete(parent.perm_id).await,
            Err(BlogError::Conflict(_))
        ));
        assert!(matches!(
            service.delete(child.perm_id).await,
            Err(BlogError::Conflict(_))
        ));

        db.roles().replace_permissions(2, &[]).await.unwrap();
        service.delete(child.perm_id).await.unwrap();
        service.delete(parent.perm_id).await.unwrap();
        assert!(matches!(
            service.get(parent.perm_id).await,
            Err(BlogError::NotFound(_))
        ));
    }
}
