//! Core JWT handler implementation

use super::types::{Claims, JwtHandler, TokenPair, TokenType};
use crate::config::AuthConfig;
use crate::utils::error::{BlogError, Result};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};
use uuid::Uuid;

impl JwtHandler {
    /// Create a new JWT handler
    pub fn new(config: &AuthConfig) -> Self {
        let secret = config.jwt_secret.as_bytes();

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
            expiration: config.jwt_expiration,
            refresh_expiration: config.refresh_expiration,
            issuer: config.issuer.clone(),
        }
    }

    /// Access token lifetime in seconds
    pub fn expiration(&self) -> u64 {
        self.expiration
    }

    fn now() -> Result<u64> {
        Ok(SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| BlogError::internal(format!("System time error: {}", e)))?
            .as_secs())
    }

    fn sign(&self, claims: &Claims) -> Result<String> {
        let header = Header::new(self.algorithm);
        encode(&header, claims, &self.encoding_key).map_err(BlogError::Jwt)
    }

    /// Create an access token carrying the user's role ids
    pub fn create_access_token(
        &self,
        user_id: i32,
        username: &str,
        role_ids: Vec<i32>,
    ) -> Result<String> {
        let now = Self::now()?;

        let claims = Claims {
            sub: user_id,
            username: username.to_string(),
            role_ids,
            iat: now,
            exp: now + self.expiration,
            iss: self.issuer.clone(),
            jti: Uuid::new_v4().to_string(),
            token_type: TokenType::Access,
        };

        let token = self.sign(&claims)?;
        debug!("Created access token for user: {}", user_id);
        Ok(token)
    }

    /// Create a refresh token for a user
    pub fn create_refresh_token(&self, user_id: i32, username: &str) -> Result<String> {
        let now = Self::now()?;

        let claims = Claims {
            sub: user_id,
            username: username.to_string(),
            role_ids: vec![],
            iat: now,
            exp: now + self.refresh_expiration,
            iss: self.issuer.clone(),
            jti: Uuid::new_v4().to_string(),
            token_type: TokenType::Refresh,
        };

        let token = self.sign(&claims)?;
        debug!("Created refresh token for user: {}", user_id);
        Ok(token)
    }

    /// Create a token pair (access + refresh)
    pub fn create_token_pair(
        &self,
        user_id: i32,
        username: &str,
        role_ids: Vec<i32>,
    ) -> Result<TokenPair> {
        Ok(TokenPair {
            access_token: self.create_access_token(user_id, username, role_ids)?,
            refresh_token: self.create_refresh_token(user_id, username)?,
            token_type: "Bearer".to_string(),
            expires_in: self.expiration,
        })
    }

    /// Verify signature, issuer and expiry and decode the claims
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::new(self.algorithm);
        validation.set_issuer(&[&self.issuer]);
        validation.leeway = 0;

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            warn!("JWT verification failed: {}", e);
            BlogError::Jwt(e)
        })?;

        Ok(token_data.claims)
    }

    /// Verify an access token
    pub fn verify_access_token(&self, token: &str) -> Result<Claims> {
        let claims = self.verify_token(token)?;
        if claims.token_type != TokenType::Access {
            return Err(BlogError::unauthorized("Refresh tokens cannot be used for API access"));
        }
        debug!("Access token verified for user: {}", claims.sub);
        Ok(claims)
    }

    /// Verify a refresh token and return the user id
    pub fn verify_refresh_token(&self, token: &str) -> Result<i32> {
        let claims = self.verify_token(token)?;
        if claims.token_type != TokenType::Refresh {
            return Err(BlogError::unauthorized("Invalid token type for refresh"));
        }
        Ok(claims.sub)
    }
}
