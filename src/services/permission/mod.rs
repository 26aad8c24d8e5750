//! Permission administration and permission trees

mod service;


pub use service::PermissionService;
