//! # blog-rs
//!
//! Blog/CMS administration backend built on actix-web and SeaORM.
//!
//! ## Features
//!
//! - **RBAC**: users hold roles, roles hold permissions; api permissions carry
//!   `METHOD:/path` access descriptors that gate the admin API
//! - **Superuser bypass**: role `1` passes every check without a storage query
//! - **Permission trees**: menus, buttons and api nodes assembled into navigation trees
//! - **Categories**: hierarchical content categories with materialized paths
//! - **JWT**: access and refresh tokens carrying the caller's role ids
//!
//! ## Server mode
//!
//! ```rust,no_run
//! use blog_rs::{Blog, Config};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config/blog.yaml").await?;
//!     let blog = Blog::new(config).await?;
//!     blog.run().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Checking access directly
//!
//! ```rust,no_run
//! use blog_rs::auth::rbac::RbacSystem;
//! use blog_rs::storage::StorageLayer;
//!
//! # async fn demo(storage: StorageLayer) -> blog_rs::Result<()> {
//! let rbac = RbacSystem::new(storage.permissions());
//! let allowed = rbac
//!     .check_permission(42, &[2], "/admin/api/v1/categories", "GET")
//!     .await?;
//! # let _ = allowed;
//! # Ok(())
//! # }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod auth;
pub mod config;
pub mod core;
pub mod server;
pub mod services;
pub mod storage;
pub mod utils;

// Re-export main types
pub use config::Config;
pub use utils::error::{BlogError, Result};

pub use core::models::{
    Category, Permission, PermissionType, Role, SUPER_ADMIN_ROLE_ID, User, UserProfile,
};
pub use core::tree::{TreeItem, TreeNode, build_tree};

use tracing::info;

/// The blog backend: configuration plus a ready-to-run HTTP server
pub struct Blog {
    config: Config,
    server: server::HttpServer,
}

impl Blog {
    /// Connect storage and build the server
    pub async fn new(config: Config) -> Result<Self> {
        info!("Creating blog backend instance");
        let server = server::HttpServer::new(&config).await?;
        Ok(Self { config, server })
    }

    /// Run the HTTP server until shutdown
    pub async fn run(self) -> Result<()> {
        info!(address = %self.config.server.address(), "Starting blog backend");
        self.server.start().await
    }
}

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
