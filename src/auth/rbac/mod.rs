//! Role-based access control
//!
//! API-type permissions carry an access descriptor `METHOD:path_pattern`. A request
//! is allowed when any enabled permission of any enabled role held by the caller
//! matches its method and path. Role 1 passes unconditionally.

mod matcher;
mod system;
pub mod types;


pub use matcher::{first_match, validate_descriptor};
pub use system::RbacSystem;
pub use types::{AccessDecision, AccessDescriptor, MethodPattern, PathPattern};
