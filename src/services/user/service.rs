use super::types::{
    ChangePasswordRequest, CreateUserRequest, LoginRequest, LoginResponse, ProfileUpdateRequest,
    RegisterRequest, ResetPasswordRequest,
};
use crate::auth::jwt::{JwtHandler, TokenPair};
use crate::auth::password::{hash_password, verify_password};
use crate::core::models::{DEFAULT_ROLE_ID, User, UserProfile};
use crate::services::role::unique_ids;
use crate::storage::repository::{
    NewUser, Page, Paged, RoleRepository, UserFilter, UserPatch, UserRepository,
};
use crate::utils::error::{BlogError, Result};
use crate::utils::validation;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{info, warn};

const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Account operations
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
    roles: Arc<dyn RoleRepository>,
    jwt: Arc<JwtHandler>,
}

/// Trim optional text and drop it when blank
fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl UserService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        roles: Arc<dyn RoleRepository>,
        jwt: Arc<JwtHandler>,
    ) -> Self {
        Self { users, roles, jwt }
    }

    async fn require(&self, user_id: i32) -> Result<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| BlogError::not_found(format!("User {} not found", user_id)))
    }

    async fn ensure_username_free(&self, username: &str) -> Result<()> {
        if self.users.find_by_username(username).await?.is_some() {
            return Err(BlogError::conflict(format!("Username {} is taken", username)));
        }
        Ok(())
    }

    async fn ensure_email_free(&self, email: &str, except: Option<i32>) -> Result<()> {
        match self.users.find_by_email(email).await? {
            Some(existing) if Some(existing.user_id) != except => Err(BlogError::conflict(
                format!("Email {} is already registered", email),
            )),
            _ => Ok(()),
        }
    }

    async fn ensure_roles_exist(&self, role_ids: &[i32]) -> Result<()> {
        let found: BTreeSet<i32> = self
            .roles
            .find_by_ids(role_ids)
            .await?
            .into_iter()
            .map(|r| r.role_id)
            .collect();
        let missing: Vec<i32> = role_ids
            .iter()
            .copied()
            .filter(|id| !found.contains(id))
            .collect();
        if !missing.is_empty() {
            return Err(BlogError::validation(format!("Unknown role ids: {:?}", missing)));
        }
        Ok(())
    }

    async fn new_user(
        &self,
        username: &str,
        password: &str,
        email: Option<String>,
        nickname: Option<String>,
        avatar: Option<String>,
        is_enabled: bool,
    ) -> Result<NewUser> {
        let username = username.trim();
        validation::username(username)?;
        validation::password(password)?;
        let email = optional(email);
        if let Some(email) = &email {
            validation::email(email)?;
        }

        self.ensure_username_free(username).await?;
        if let Some(email) = &email {
            self.ensure_email_free(email, None).await?;
        }

        Ok(NewUser {
            username: username.to_string(),
            password_hash: hash_password(password)?,
            email,
            nickname: optional(nickname),
            avatar: optional(avatar),
            is_enabled,
        })
    }

    async fn profile_of(&self, user: User) -> Result<UserProfile> {
        let role_ids = self.users.role_ids(user.user_id).await?;
        let role_keys = if role_ids.is_empty() {
            Vec::new()
        } else {
            self.roles
                .find_by_ids(&role_ids)
                .await?
                .into_iter()
                .map(|r| r.role_key)
                .collect()
        };
        Ok(UserProfile {
            user,
            role_ids,
            role_keys,
        })
    }

    /// Create an enabled account holding the default role
    pub async fn register(&self, request: RegisterRequest) -> Result<User> {
        let new = self
            .new_user(
                &request.username,
                &request.password,
                request.email,
                request.nickname,
                None,
                true,
            )
            .await?;

        let user = self.users.create(new, &[DEFAULT_ROLE_ID]).await?;
        info!(user_id = user.user_id, username = %user.username, "User registered");
        Ok(user)
    }

    /// Verify credentials and issue a token pair carrying the user's role ids
    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse> {
        let Some(user) = self.users.find_by_username(request.username.trim()).await? else {
            warn!(username = %request.username, "Login for unknown user");
            return Err(BlogError::unauthorized(INVALID_CREDENTIALS));
        };

        if !verify_password(&request.password, &user.password_hash)? {
            warn!(user_id = user.user_id, "Login with wrong password");
            return Err(BlogError::unauthorized(INVALID_CREDENTIALS));
        }
        if !user.is_enabled {
            return Err(BlogError::forbidden("Account is disabled"));
        }

        let profile = self.profile_of(user).await?;
        let tokens = self.jwt.create_token_pair(
            profile.user.user_id,
            &profile.user.username,
            profile.role_ids.clone(),
        )?;
        self.users.touch_last_login(profile.user.user_id).await?;

        info!(user_id = profile.user.user_id, roles = ?profile.role_ids, "User logged in");
        Ok(LoginResponse {
            tokens,
            user: profile,
        })
    }

    /// Exchange a refresh token for a new access token with freshly resolved roles
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair> {
        let user_id = self.jwt.verify_refresh_token(refresh_token)?;
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| BlogError::unauthorized("Account no longer exists"))?;
        if !user.is_enabled {
            return Err(BlogError::forbidden("Account is disabled"));
        }

        let role_ids = self.users.role_ids(user_id).await?;
        let access_token = self
            .jwt
            .create_access_token(user_id, &user.username, role_ids)?;

        Ok(TokenPair {
            access_token,
            refresh_token: refresh_token.to_string(),
            token_type: "Bearer".to_string(),
            expires_in: self.jwt.expiration(),
        })
    }

    pub async fn profile(&self, user_id: i32) -> Result<UserProfile> {
        let user = self.require(user_id).await?;
        self.profile_of(user).await
    }

    /// Whether the user holds the built-in administrator role key
    pub async fn is_admin(&self, user_id: i32) -> Result<bool> {
        Ok(self.profile(user_id).await?.is_admin())
    }

    pub async fn create(&self, request: CreateUserRequest) -> Result<UserProfile> {
        let role_ids = if request.role_ids.is_empty() {
            vec![DEFAULT_ROLE_ID]
        } else {
            unique_ids(&request.role_ids)
        };
        self.ensure_roles_exist(&role_ids).await?;

        let new = self
            .new_user(
                &request.username,
                &request.password,
                request.email,
                request.nickname,
                request.avatar,
                request.is_enabled,
            )
            .await?;

        let user = self.users.create(new, &role_ids).await?;
        info!(user_id = user.user_id, roles = ?role_ids, "User created");
        self.profile_of(user).await
    }

    pub async fn list(&self, filter: UserFilter, page: Page) -> Result<Paged<User>> {
        self.users.list(filter, page).await
    }

    pub async fn get(&self, user_id: i32) -> Result<UserProfile> {
        self.profile(user_id).await
    }

    pub async fn update(&self, user_id: i32, mut patch: UserPatch) -> Result<User> {
        self.require(user_id).await?;

        if let Some(email) = patch.email.take() {
            let email = email.trim().to_string();
            if !email.is_empty() {
                validation::email(&email)?;
                self.ensure_email_free(&email, Some(user_id)).await?;
            }
            patch.email = Some(email);
        }

        let user = self.users.update(user_id, patch).await?;
        info!(user_id, "User updated");
        Ok(user)
    }

    /// The caller's own nickname, email and avatar
    pub async fn update_profile(
        &self,
        user_id: i32,
        request: ProfileUpdateRequest,
    ) -> Result<UserProfile> {
        let patch = UserPatch {
            email: request.email,
            nickname: request.nickname,
            avatar: request.avatar,
        };
        let user = self.update(user_id, patch).await?;
        self.profile_of(user).await
    }

    /// Replace the caller's password after checking the current one
    pub async fn change_password(&self, user_id: i32, request: ChangePasswordRequest) -> Result<()> {
        let user = self.require(user_id).await?;

        if !verify_password(&request.old_password, &user.password_hash)? {
            warn!(user_id, "Password change with wrong current password");
            return Err(BlogError::bad_request("Current password is incorrect"));
        }
        validation::password(&request.new_password)?;

        let hash = hash_password(&request.new_password)?;
        self.users.set_password_hash(user_id, &hash).await?;
        info!(user_id, "Password changed");
        Ok(())
    }

    /// Administrator override; the old password is not needed
    pub async fn reset_password(
        &self,
        actor_id: i32,
        user_id: i32,
        request: ResetPasswordRequest,
    ) -> Result<()> {
        self.require(user_id).await?;
        validation::password(&request.password)?;

        let hash = hash_password(&request.password)?;
        self.users.set_password_hash(user_id, &hash).await?;
        info!(user_id, actor_id, "Password reset");
        Ok(())
    }

    /// `actor_id` is the caller; an account cannot disable itself
    pub async fn set_enabled(&self, actor_id: i32, user_id: i32, enabled: bool) -> Result<()> {
        if actor_id == user_id && !enabled {
            return Err(BlogError::bad_request("You cannot disable your own account"));
        }
        self.require(user_id).await?;
        self.users.set_enabled(user_id, enabled).await?;
        info!(user_id, enabled, actor_id, "User status changed");
        Ok(())
    }

    /// Replace the user's role set; every id must name an existing role
    pub async fn assign_roles(&self, user_id: i32, role_ids: &[i32]) -> Result<Vec<i32>> {
        self.require(user_id).await?;

        let role_ids = unique_ids(role_ids);
        if !role_ids.is_empty() {
            self.ensure_roles_exist(&role_ids).await?;
        }

        self.users.replace_roles(user_id, &role_ids).await?;
        info!(user_id, roles = ?role_ids, "User roles replaced");
        Ok(role_ids)
    }

    pub async fn delete(&self, actor_id: i32, user_id: i32) -> Result<()> {
        if actor_id == user_id {
            return Err(BlogError::bad_request("You cannot delete your own account"));
        }
        self.require(user_id).await?;
        self.users.delete(user_id).await?;
        info!(user_id, actor_id, "User deleted");
        Ok(())
    }
}
