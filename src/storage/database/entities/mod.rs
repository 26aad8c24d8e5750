/// Content category entity module
pub mod category;
/// Permission entity module
pub mod permission;
/// Role entity module
pub mod role;
/// Role to permission link entity module
pub mod role_permission;
/// User entity module
pub mod user;
/// User to role link entity module
pub mod user_role;

pub use category::Entity as Category;
pub use permission::Entity as Permission;
pub use role::Entity as Role;
pub use role_permission::Entity as RolePermission;
pub use user::Entity as User;
pub use user_role::Entity as UserRole;
