//! RBAC check against stored permissions

use super::matcher::first_match;
use super::types::AccessDecision;
use crate::core::models::SUPER_ADMIN_ROLE_ID;
use crate::storage::repository::PermissionRepository;
use crate::utils::error::Result;
use std::sync::Arc;
use tracing::{debug, error};

/// Decides whether a caller's roles admit a request
#[derive(Clone)]
pub struct RbacSystem {
    permissions: Arc<dyn PermissionRepository>,
}

impl std::fmt::Debug for RbacSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RbacSystem").finish_non_exhaustive()
    }
}

impl RbacSystem {
    pub fn new(permissions: Arc<dyn PermissionRepository>) -> Self {
        Self { permissions }
    }

    /// Check one request.
    ///
    /// A storage failure is returned as an error and never turned into
    /// [`AccessDecision::Denied`].
    pub async fn check_access(
        &self,
        user_id: i32,
        role_ids: &[i32],
        path: &str,
        method: &str,
    ) -> Result<AccessDecision> {
        if role_ids.contains(&SUPER_ADMIN_ROLE_ID) {
            debug!(user_id, path, method, "Superuser bypass");
            return Ok(AccessDecision::Superuser);
        }

        if role_ids.is_empty() {
            debug!(user_id, path, method, "No roles, access denied");
            return Ok(AccessDecision::Denied);
        }

        let grants = self
            .permissions
            .api_grants_for_roles(role_ids)
            .await
            .map_err(|e| {
                error!(
                    user_id,
                    ?role_ids,
                    path,
                    method,
                    error = %e,
                    "Failed to load permissions for access check"
                );
                e
            })?;

        let decision = match first_match(&grants, method, path) {
            Some(grant) => AccessDecision::Granted {
                perm_id: grant.perm_id,
                descriptor: grant.access_descriptor.clone(),
            },
            None => AccessDecision::Denied,
        };

        debug!(
            user_id,
            ?role_ids,
            path,
            method,
            candidates = grants.len(),
            ?decision,
            "Access check finished"
        );
        Ok(decision)
    }

    /// Boolean form of [`RbacSystem::check_access`]
    pub async fn check_permission(
        &self,
        user_id: i32,
        role_ids: &[i32],
        path: &str,
        method: &str,
    ) -> Result<bool> {
        Ok(self
            .check_access(user_id, role_ids, path, method)
            .await?
            .is_allowed())
    }
}
