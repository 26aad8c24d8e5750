//! Services module
//!
//! Administration logic over the repository traits: validation, uniqueness and
//! existence checks, then the storage call.

pub mod category;
pub mod permission;
pub mod role;
pub mod user;

pub use category::CategoryService;
pub use permission::PermissionService;
pub use role::RoleService;
pub use user::UserService;
