//! Application state shared across HTTP handlers

use crate::auth::AuthSystem;
use crate::config::Config;
use crate::services::{CategoryService, PermissionService, RoleService, UserService};
use crate::storage::StorageLayer;
use std::sync::Arc;

/// HTTP server state shared across handlers
///
/// Everything in here is cheap to clone; handlers receive it as `web::Data<AppState>`.
#[derive(Clone)]
pub struct AppState {
    /// Configuration (shared read-only)
    pub config: Arc<Config>,
    pub storage: Arc<StorageLayer>,
    pub auth: Arc<AuthSystem>,
    pub permissions: PermissionService,
    pub roles: RoleService,
    pub users: UserService,
    pub categories: CategoryService,
}

impl AppState {
    /// Wire services to the repositories of `storage`
    pub fn new(config: Config, storage: StorageLayer) -> Self {
        let auth = AuthSystem::new(&config.auth, &storage);

        Self {
            permissions: PermissionService::new(storage.permissions()),
            roles: RoleService::new(storage.roles(), storage.permissions()),
            users: UserService::new(storage.users(), storage.roles(), auth.jwt.clone()),
            categories: CategoryService::new(storage.categories()),
            config: Arc::new(config),
            storage: Arc::new(storage),
            auth: Arc::new(auth),
        }
    }
}
