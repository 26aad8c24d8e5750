//! Error handling for the blog backend
//!
//! This module defines the error type shared by every layer and its HTTP mapping.

mod helpers;
mod response;
mod types;

pub use response::{ErrorDetail, ErrorResponse};
pub use types::{BlogError, Result};
