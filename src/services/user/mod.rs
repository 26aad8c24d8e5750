//! Accounts: registration, login, profiles and user administration

mod service;
mod types;


pub use service::UserService;
pub use types::*;
