//! Access descriptor parsing and matching

use super::types::{AccessDescriptor, MethodPattern, PathPattern};
use crate::core::models::ApiGrant;
use crate::utils::error::{BlogError, Result};
use once_cell::sync::Lazy;
use regex::Regex;

const PREFIX_SUFFIX: &str = "/*";

static DESCRIPTOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(\*|GET|POST|PUT|PATCH|DELETE|HEAD|OPTIONS):/\S*$")
        .expect("Invalid access descriptor regex")
});

impl AccessDescriptor {
    /// Split on the first `:`. Descriptors without one, or with an empty half,
    /// yield `None` and never match anything.
    pub fn parse(raw: &str) -> Option<Self> {
        let (method, path) = raw.split_once(':')?;
        if method.is_empty() || path.is_empty() {
            return None;
        }

        let method = if method == "*" {
            MethodPattern::Any
        } else {
            MethodPattern::Exact(method.to_string())
        };

        let path = match path.strip_suffix(PREFIX_SUFFIX) {
            Some(prefix) => PathPattern::Prefix(prefix.to_string()),
            None => PathPattern::Exact(path.to_string()),
        };

        Some(Self { method, path })
    }

    pub fn matches_method(&self, method: &str) -> bool {
        match &self.method {
            MethodPattern::Any => true,
            MethodPattern::Exact(expected) => expected.eq_ignore_ascii_case(method),
        }
    }

    /// Prefix patterns compare bytes, so `/a/*` also admits `/ab`
    pub fn matches_path(&self, path: &str) -> bool {
        match &self.path {
            PathPattern::Prefix(prefix) => path.starts_with(prefix.as_str()),
            PathPattern::Exact(expected) => expected == path,
        }
    }

    pub fn matches(&self, method: &str, path: &str) -> bool {
        self.matches_method(method) && self.matches_path(path)
    }
}

/// First grant whose descriptor admits the request
pub fn first_match<'a>(grants: &'a [ApiGrant], method: &str, path: &str) -> Option<&'a ApiGrant> {
    grants.iter().find(|grant| {
        AccessDescriptor::parse(&grant.access_descriptor)
            .is_some_and(|descriptor| descriptor.matches(method, path))
    })
}

/// Stricter check applied when a descriptor is written: a known verb or `*`,
/// then a path starting with `/`.
pub fn validate_descriptor(raw: &str) -> Result<AccessDescriptor> {
    if !DESCRIPTOR_RE.is_match(raw) {
        return Err(BlogError::validation(format!(
            "Invalid access descriptor {:?}, expected METHOD:/path or METHOD:/prefix/*",
            raw
        )));
    }
    AccessDescriptor::parse(raw)
        .ok_or_else(|| BlogError::validation(format!("Invalid access descriptor {:?}", raw)))
}
