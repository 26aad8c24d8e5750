//! Utility modules for the blog backend
//!
//! - **error**: the crate-wide error type and its HTTP mapping
//! - **logging**: tracing subscriber setup
//! - **validation**: shared input checks

pub mod error;
pub mod logging;
pub mod validation;

pub use error::{BlogError, Result};
