//! Application state - shared across all handlers.

use std::sync::Arc;

use gazette_core::ports::{
    CategoryRepository, PostImageRepository, PostRepository, TagRepository, UserRepository,
};
use gazette_infra::InMemoryStore;
use gazette_infra::database::{
    DatabaseConfig, DatabaseConnections, PostgresCategoryRepository, PostgresPostImageRepository,
    PostgresPostRepository, PostgresTagRepository, PostgresUserRepository,
};

/// Shared application state: one repository handle per entity.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub tags: Arc<dyn TagRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub images: Arc<dyn PostImageRepository>,
    pub db: Option<Arc<DatabaseConnections>>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(db_config: Option<&DatabaseConfig>) -> Self {
        if let Some(config) = db_config {
            match DatabaseConnections::init(config).await {
                Ok(connections) => {
                    let conn = Arc::new(connections);
                    let state = Self {
                        users: Arc::new(PostgresUserRepository::new(conn.main.clone())),
                        categories: Arc::new(PostgresCategoryRepository::new(conn.main.clone())),
                        tags: Arc::new(PostgresTagRepository::new(conn.main.clone())),
                        posts: Arc::new(PostgresPostRepository::new(conn.main.clone())),
                        images: Arc::new(PostgresPostImageRepository::new(conn.main.clone())),
                        db: Some(conn),
                    };
                    tracing::info!("Application state initialized");
                    return state;
                }
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                }
            }
        } else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
        }

        let store = InMemoryStore::new();
        Self {
            users: Arc::new(store.users()),
            categories: Arc::new(store.categories()),
            tags: Arc::new(store.tags()),
            posts: Arc::new(store.posts()),
            images: Arc::new(store.images()),
            db: None,
        }
    }
}
