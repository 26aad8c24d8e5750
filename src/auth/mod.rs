//! Authentication and authorization
//!
//! JWT issue and verification, password hashing and the RBAC request check.

pub mod jwt;
pub mod password;
pub mod rbac;

use crate::config::AuthConfig;
use crate::storage::StorageLayer;
use std::sync::Arc;
use tracing::info;

/// Authentication and authorization handles shared by the HTTP layer
#[derive(Debug, Clone)]
pub struct AuthSystem {
    /// JWT handler
    pub jwt: Arc<jwt::JwtHandler>,
    /// RBAC system
    pub rbac: Arc<rbac::RbacSystem>,
}

impl AuthSystem {
    /// Create a new authentication system
    pub fn new(config: &AuthConfig, storage: &StorageLayer) -> Self {
        info!("Initializing authentication system");

        Self {
            jwt: Arc::new(jwt::JwtHandler::new(config)),
            rbac: Arc::new(rbac::RbacSystem::new(storage.permissions())),
        }
    }
}
