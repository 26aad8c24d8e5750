//! JWT token handling
//!
//! Access and refresh token creation and verification.

mod handler;
pub mod types;


pub use types::{Claims, JwtHandler, TokenPair, TokenType};
