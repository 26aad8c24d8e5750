//! User model

use super::role::ADMIN_ROLE_KEY;
use crate::storage::database::entities::user;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub user_id: i32,
    pub username: String,
    /// Never serialized
    #[serde(skip)]
    pub password_hash: String,
    pub email: Option<String>,
    pub nickname: Option<String>,
    pub avatar: Option<String>,
    pub is_enabled: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<user::Model> for User {
    fn from(model: user::Model) -> Self {
        Self {
            user_id: model.user_id,
            username: model.username,
            password_hash: model.password_hash,
            email: model.email,
            nickname: model.nickname,
            avatar: model.avatar,
            is_enabled: model.is_enabled,
            last_login_at: model.last_login_at.map(|dt| dt.with_timezone(&Utc)),
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

/// User together with the roles it holds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(flatten)]
    pub user: User,
    pub role_ids: Vec<i32>,
    pub role_keys: Vec<String>,
}

impl UserProfile {
    /// Built-in administrator check by role key
    ///
    /// This is independent of the numeric superuser bypass used by the RBAC gate.
    pub fn is_admin(&self) -> bool {
        self.role_keys.iter().any(|key| key == ADMIN_ROLE_KEY)
    }
}
