//! Test database utilities
//!
//! Each test gets an isolated in-memory SQLite database with the schema migrated
//! and the built-in roles seeded.

use blog_rs::config::{AuthConfig, Config, DatabaseConfig};
use blog_rs::server::AppState;
use blog_rs::storage::StorageLayer;
use blog_rs::storage::database::Database;
use blog_rs::storage::repository::{
    CategoryRepository, PermissionRepository, RoleRepository, UserRepository,
};
use std::sync::Arc;

/// Signing secret shared by HTTP tests
pub const TEST_JWT_SECRET: &str = "integration_test_secret_0123456789abcdef";

/// Helper to create a simple test database config
pub fn test_db_config() -> DatabaseConfig {
    DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        // an in-memory database only exists on its one connection
        max_connections: 1,
        connection_timeout: 5,
        auto_migrate: true,
    }
}

/// Test database wrapper providing isolated in-memory SQLite instances
#[derive(Debug, Clone)]
pub struct TestDatabase {
    storage: StorageLayer,
}

impl TestDatabase {
    pub async fn new() -> Self {
        let db = Database::new(&test_db_config())
            .await
            .expect("Failed to create in-memory test database");

        db.migrate()
            .await
            .expect("Failed to run database migrations");

        Self {
            storage: StorageLayer::from_database(db),
        }
    }

    pub fn db(&self) -> Arc<Database> {
        Arc::clone(&self.storage.database)
    }

    pub fn storage(&self) -> StorageLayer {
        self.storage.clone()
    }

    pub fn permissions(&self) -> Arc<dyn PermissionRepository> {
        self.storage.permissions()
    }

    pub fn roles(&self) -> Arc<dyn RoleRepository> {
        self.storage.roles()
    }

    pub fn users(&self) -> Arc<dyn UserRepository> {
        self.storage.users()
    }

    pub fn categories(&self) -> Arc<dyn CategoryRepository> {
        self.storage.categories()
    }

    /// Application state over this database with a fixed JWT secret
    pub fn app_state(&self) -> AppState {
        let mut config = Config::default();
        config.database = test_db_config();
        config.auth = AuthConfig {
            jwt_secret: TEST_JWT_SECRET.to_string(),
            ..AuthConfig::default()
        };
        AppState::new(config, self.storage())
    }
}
