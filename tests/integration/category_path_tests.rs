//! Category hierarchy integration tests
//!
//! Materialized paths are written by the repository, so these run against SQLite.

#[cfg(test)]
mod tests {
    use crate::common::{TestDatabase, fixtures};
    use blog_rs::core::models::Category;
    use blog_rs::services::CategoryService;
    use blog_rs::storage::repository::CategoryPatch;
    use blog_rs::utils::error::BlogError;

    async fn path_of(db: &TestDatabase, id: i32) -> String {
        db.categories().find_by_id(id).await.unwrap().unwrap().path
    }

    fn move_to(parent_id: i32) -> CategoryPatch {
        CategoryPatch {
            parent_id: Some(parent_id),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_paths_are_materialized_on_create() {
        let db = TestDatabase::new().await;
        let service = CategoryService::new(db.categories());

        let tech = service.create(fixtures::category("tech", None)).await.unwrap();
        let rust = service
            .create(fixtures::category("rust", Some(tech.category_id)))
            .await
            .unwrap();
        let web = service
            .create(fixtures::category("web", Some(rust.category_id)))
            .await
            .unwrap();

        assert_eq!(tech.path, tech.category_id.to_string());
        assert_eq!(rust.path, format!("{}/{}", tech.category_id, rust.category_id));
        assert_eq!(
            web.path,
            format!("{}/{}/{}", tech.category_id, rust.category_id, web.category_id)
        );
        assert_eq!(web.parent_id, Some(rust.category_id));
    }

    #[tokio::test]
    async fn test_reparent_rebases_descendants() {
        let db = TestDatabase::new().await;
        let service = CategoryService::new(db.categories());

        let a = service.create(fixtures::category("a", None)).await.unwrap();
        let b = service.create(fixtures::category("b", None)).await.unwrap();
        let c = service
            .create(fixtures::category("c", Some(a.category_id)))
            .await
            .unwrap();
        let d = service
            .create(fixtures::category("d", Some(c.category_id)))
            .await
            .unwrap();

        let moved = service.update(c.category_id, move_to(b.category_id)).await.unwrap();
        assert_eq!(moved.parent_id, Some(b.category_id));
        assert_eq!(moved.path, format!("{}/{}", b.category_id, c.category_id));
        assert_eq!(
            path_of(&db, d.category_id).await,
            format!("{}/{}/{}", b.category_id, c.category_id, d.category_id)
        );
        // untouched siblings keep their path
        assert_eq!(path_of(&db, a.category_id).await, a.category_id.to_string());

        let root = service.update(c.category_id, move_to(0)).await.unwrap();
        assert_eq!(root.parent_id, None);
        assert_eq!(root.path, c.category_id.to_string());
        assert_eq!(
            path_of(&db, d.category_id).await,
            format!("{}/{}", c.category_id, d.category_id)
        );
    }

    #[tokio::test]
    async fn test_move_under_descendant_is_rejected() {
        let db = TestDatabase::new().await;
        let service = CategoryService::new(db.categories());

        let a = service.create(fixtures::category("a", None)).await.unwrap();
        let b = service
            .create(fixtures::category("b", Some(a.category_id)))
            .await
            .unwrap();

        let result = service.update(a.category_id, move_to(b.category_id)).await;
        assert!(matches!(result, Err(BlogError::Validation(_))));
        let result = service.update(a.category_id, move_to(a.category_id)).await;
        assert!(matches!(result, Err(BlogError::Validation(_))));

        // nothing was written
        assert_eq!(path_of(&db, a.category_id).await, a.category_id.to_string());

        // the repository enforces the same rule on its own
        let result = db.categories().update(a.category_id, move_to(b.category_id)).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_descendants_and_is_descendant() {
        let db = TestDatabase::new().await;
        let service = CategoryService::new(db.categories());

        let a = service.create(fixtures::category("a", None)).await.unwrap();
        let b = service
            .create(fixtures::category("b", Some(a.category_id)))
            .await
            .unwrap();
        let c = service
            .create(fixtures::category("c", Some(b.category_id)))
            .await
            .unwrap();
        let other = service.create(fixtures::category("other", None)).await.unwrap();

        let mut ids: Vec<i32> = service
            .descendants(a.category_id)
            .await
            .unwrap()
            .iter()
            .map(|cat: &Category| cat.category_id)
            .collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![b.category_id, c.category_id]);

        assert!(service.is_descendant(c.category_id, a.category_id).await.unwrap());
        assert!(!service.is_descendant(a.category_id, c.category_id).await.unwrap());
        assert!(!service.is_descendant(other.category_id, a.category_id).await.unwrap());
        assert!(!service.is_descendant(a.category_id, a.category_id).await.unwrap());
    }

    #[tokio::test]
    async fn test_visible_tree_hides_subtrees() {
        let db = TestDatabase::new().await;
        let service = CategoryService::new(db.categories());

        let shown = service.create(fixtures::category("shown", None)).await.unwrap();
        let mut hidden = fixtures::category("hidden", Some(shown.category_id));
        hidden.is_visible = false;
        let hidden = service.create(hidden).await.unwrap();
        service
            .create(fixtures::category("below_hidden", Some(hidden.category_id)))
            .await
            .unwrap();

        let full = service.tree(false).await.unwrap();
        assert_eq!(full.len(), 1);
        assert_eq!(full[0].size(), 3);

        let visible = service.tree(true).await.unwrap();
        assert_eq!(visible.len(), 1);
        assert!(visible[0].children.is_empty());
    }

    #[tokio::test]
    async fn test_delete_requires_leaf() {
        let db = TestDatabase::new().await;
        let service = CategoryService::new(db.categories());

        let parent = service.create(fixtures::category("parent", None)).await.unwrap();
        let child = service
            .create(fixtures::category("child", Some(parent.category_id)))
            .await
            .unwrap();

        assert!(matches!(
            service.delete(parent.category_id).await,
            Err(BlogError::Conflict(_))
        ));
        service.delete(child.category_id).await.unwrap();
        service.delete(parent.category_id).await.unwrap();
        assert!(matches!(
            service.get(parent.category_id).await,
            Err(BlogError::NotFound(_))
        ));
    }
}
