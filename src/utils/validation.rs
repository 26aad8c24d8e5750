//! Input validation shared by the services

use crate::utils::error::{BlogError, Result};
use once_cell::sync::Lazy;
use regex::Regex;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_]{3,32}$").expect("Invalid username regex"));

static KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_:.\-]{0,127}$").expect("Invalid key regex"));

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("Invalid email regex"));

/// Require a non-blank value and return it trimmed
pub fn required(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(BlogError::validation(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

pub fn username(value: &str) -> Result<()> {
    if !USERNAME_RE.is_match(value) {
        return Err(BlogError::validation(
            "Username must be 3-32 letters, digits or underscores",
        ));
    }
    Ok(())
}

/// Machine keys such as `system:user:list`
pub fn key(field: &str, value: &str) -> Result<()> {
    if !KEY_RE.is_match(value) {
        return Err(BlogError::validation(format!(
            "{} must start with a letter and contain only letters, digits and _ : . -",
            field
        )));
    }
    Ok(())
}

pub fn email(value: &str) -> Result<()> {
    if !EMAIL_RE.is_match(value) {
        return Err(BlogError::validation(format!("Invalid email address: {}", value)));
    }
    Ok(())
}

pub fn password(value: &str) -> Result<()> {
    if value.chars().count() < 6 || value.chars().count() > 64 {
        return Err(BlogError::validation("Password must be 6-64 characters"));
    }
    Ok(())
}
