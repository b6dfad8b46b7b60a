#[cfg(test)]
mod tests {
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use uuid::Uuid;

    use gazette_core::domain::Post;
    use gazette_core::error::RepoError;
    use gazette_core::ports::{PostFilter, PostRepository};

    use crate::database::entity::post;
    use crate::database::postgres_repo::PostgresPostRepository;

    fn post_row(slug: &str, status: &str) -> post::Model {
        let now = Utc::now();
        post::Model {
            id: Uuid::new_v4(),
            author_id: Uuid::new_v4(),
            title: "Test Post".to_owned(),
            slug: slug.to_owned(),
            content: "Content".to_owned(),
            category_id: None,
            status: status.to_owned(),
            meta_description: String::new(),
            featured_image: None,
            views: 0,
            created_at: now.into(),
            updated_at: now.into(),
            published_at: now.into(),
        }
    }

    #[tokio::test]
    async fn test_find_published_post_by_slug() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![post_row("test-post", "published")]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let result: Option<Post> = repo.find_published_by_slug("test-post").await.unwrap();

        assert!(result.is_some());
        let found = result.unwrap();
        assert_eq!(found.slug, "test-post");
        assert!(found.is_published());
    }

    #[tokio::test]
    async fn test_list_published_applies_filters_in_sql() {
        let conn = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![post_row("hello", "published")]])
            .into_connection();

        let repo = PostgresPostRepository::new(conn.clone());

        let filter = PostFilter {
            search: Some("rust".to_string()),
            category: Some("tech".to_string()),
            tag: Some("async".to_string()),
        };
        let posts = repo.list_published(&filter, 6, 0).await.unwrap();
        assert_eq!(posts.len(), 1);

        let log = format!("{:?}", conn.into_transaction_log());
        assert!(log.contains("ILIKE"), "search should use ILIKE: {log}");
        assert!(log.contains("status"), "published predicate missing: {log}");
        assert!(
            log.contains("ORDER BY") && log.contains("published_at"),
            "ordering missing: {log}"
        );
    }

    #[tokio::test]
    async fn test_increment_views_is_single_update() {
        let conn = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        let repo = PostgresPostRepository::new(conn.clone());

        repo.increment_views(Uuid::new_v4()).await.unwrap();

        let log = format!("{:?}", conn.into_transaction_log());
        assert!(
            log.contains("views"),
            "increment should target the views column: {log}"
        );
    }

    #[tokio::test]
    async fn test_increment_views_missing_post() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let result = repo.increment_views(Uuid::new_v4()).await;
        assert!(matches!(result, Err(RepoError::NotFound)));
    }
}
