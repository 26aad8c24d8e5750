//! Configuration management for the blog backend
//!
//! Configuration comes from a YAML file, then `BLOG_*` environment variables override
//! individual fields, then the result is validated as a whole.

pub mod models;

pub use models::*;

use crate::utils::error::{BlogError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, warn};

/// Main configuration struct
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| BlogError::Config(format!("Failed to read config file: {}", e)))?;

        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| BlogError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Load the file if present, fall back to defaults otherwise, then apply
    /// environment overrides and validate.
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if tokio::fs::try_exists(path).await.unwrap_or(false) {
            let content = tokio::fs::read_to_string(path).await?;
            serde_yaml::from_str::<Config>(&content)
                .map_err(|e| BlogError::Config(format!("Failed to parse config: {}", e)))?
        } else {
            warn!(
                "Config file {:?} not found, using defaults with a generated JWT secret",
                path
            );
            Config::default()
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `BLOG_*` overrides read through `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("BLOG_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("BLOG_PORT") {
            self.server.port = parse_var("BLOG_PORT", &port)?;
        }
        if let Some(workers) = lookup("BLOG_WORKERS") {
            self.server.workers = Some(parse_var("BLOG_WORKERS", &workers)?);
        }
        if let Some(url) = lookup("BLOG_DATABASE_URL") {
            self.database.url = url;
        }
        if let Some(max) = lookup("BLOG_DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = parse_var("BLOG_DATABASE_MAX_CONNECTIONS", &max)?;
        }
        if let Some(secret) = lookup("BLOG_JWT_SECRET") {
            self.auth.jwt_secret = secret;
        }
        if let Some(exp) = lookup("BLOG_JWT_EXPIRATION") {
            self.auth.jwt_expiration = parse_var("BLOG_JWT_EXPIRATION", &exp)?;
        }
        if let Some(exp) = lookup("BLOG_REFRESH_EXPIRATION") {
            self.auth.refresh_expiration = parse_var("BLOG_REFRESH_EXPIRATION", &exp)?;
        }
        if let Some(level) = lookup("BLOG_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("BLOG_LOG_FORMAT") {
            self.logging.format = match format.to_ascii_lowercase().as_str() {
                "json" => LogFormat::Json,
                "pretty" => LogFormat::Pretty,
                other => {
                    return Err(BlogError::Config(format!("Invalid BLOG_LOG_FORMAT: {}", other)));
                }
            };
        }
        Ok(())
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");

        self.server
            .validate()
            .map_err(|e| BlogError::Config(format!("Server config error: {}", e)))?;

        self.server
            .cors
            .validate()
            .map_err(|e| BlogError::Config(format!("CORS config error: {}", e)))?;

        self.database
            .validate()
            .map_err(|e| BlogError::Config(format!("Database config error: {}", e)))?;

        self.auth
            .validate()
            .map_err(|e| BlogError::Config(format!("Auth config error: {}", e)))?;

        warn_insecure_config(&self.auth);

        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, value: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e| BlogError::Config(format!("Invalid {}: {}", name, e)))
}
