//! Storage layer for the blog backend
//!
//! This module provides data persistence and the repository interfaces over it.

/// Database storage module
pub mod database;
/// Repository traits consumed by services and the RBAC check
pub mod repository;

use crate::config::DatabaseConfig;
use crate::utils::error::Result;
use repository::{CategoryRepository, PermissionRepository, RoleRepository, UserRepository};
use std::sync::Arc;
use tracing::{debug, info};

/// Main storage layer handing out repository handles
#[derive(Debug, Clone)]
pub struct StorageLayer {
    /// Database connection pool
    pub database: Arc<database::Database>,
}

impl StorageLayer {
    /// Connect and, when configured, bring the schema up to date
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        info!("Initializing storage layer");

        debug!("Connecting to database");
        let database = Arc::new(database::Database::new(config).await?);

        if config.auto_migrate {
            database.migrate().await?;
        }

        Ok(Self { database })
    }

    /// Wrap an already connected database
    pub fn from_database(database: database::Database) -> Self {
        Self {
            database: Arc::new(database),
        }
    }

    pub fn permissions(&self) -> Arc<dyn PermissionRepository> {
        self.database.clone()
    }

    pub fn roles(&self) -> Arc<dyn RoleRepository> {
        self.database.clone()
    }

    pub fn users(&self) -> Arc<dyn UserRepository> {
        self.database.clone()
    }

    pub fn categories(&self) -> Arc<dyn CategoryRepository> {
        self.database.clone()
    }

    /// Check storage health
    pub async fn health_check(&self) -> Result<()> {
        self.database.health_check().await
    }
}
