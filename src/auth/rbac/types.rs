//! RBAC types

use serde::Serialize;
use std::fmt;

/// Method half of an access descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodPattern {
    /// `*`
    Any,
    Exact(String),
}

/// Path half of an access descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathPattern {
    /// Pattern ended in `/*`; holds the pattern with that suffix removed
    Prefix(String),
    Exact(String),
}

/// Parsed `METHOD:path_pattern`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessDescriptor {
    pub method: MethodPattern,
    pub path: PathPattern,
}

impl fmt::Display for AccessDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.method {
            MethodPattern::Any => write!(f, "*:")?,
            MethodPattern::Exact(method) => write!(f, "{}:", method)?,
        }
        match &self.path {
            PathPattern::Prefix(prefix) => write!(f, "{}/*", prefix),
            PathPattern::Exact(path) => write!(f, "{}", path),
        }
    }
}

/// Outcome of an authorization check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum AccessDecision {
    /// Caller holds the superuser role; nothing was looked up
    Superuser,
    /// A permission matched
    Granted { perm_id: i32, descriptor: String },
    /// The check completed and nothing matched
    Denied,
}

impl AccessDecision {
    pub fn is_allowed(&self) -> bool {
        !matches!(self, Self::Denied)
    }
}
