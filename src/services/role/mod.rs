//! Role administration and role-permission bindings

mod service;


pub use service::RoleService;
pub(crate) use service::unique_ids;
