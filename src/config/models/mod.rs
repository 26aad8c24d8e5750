//! Configuration data models
//!
//! This module defines all configuration structures used by the blog backend.

pub mod auth;
pub mod logging;
pub mod server;
pub mod storage;

pub use auth::*;
pub use logging::*;
pub use server::*;
pub use storage::*;

/// Default values for configuration
pub fn default_host() -> String {
    "0.0.0.0".to_string()
}

/// Default server port
pub fn default_port() -> u16 {
    8080
}

/// Default maximum body size in bytes
pub fn default_max_body_size() -> usize {
    2 * 1024 * 1024 // 2MB
}

pub fn default_max_connections() -> u32 {
    10
}

pub fn default_connection_timeout() -> u64 {
    5
}

/// Access token lifetime in seconds
pub fn default_jwt_expiration() -> u64 {
    86400 // 24 hours
}

/// Refresh token lifetime in seconds
pub fn default_refresh_expiration() -> u64 {
    86400 * 7
}

pub fn default_issuer() -> String {
    "blog-rs".to_string()
}

pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_cors_methods() -> Vec<String> {
    ["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"]
        .iter()
        .map(|m| m.to_string())
        .collect()
}

pub fn default_cors_headers() -> Vec<String> {
    ["Authorization", "Content-Type", "X-Request-Id"]
        .iter()
        .map(|h| h.to_string())
        .collect()
}

pub fn default_cors_max_age() -> u32 {
    3600
}

pub fn default_true() -> bool {
    true
}
