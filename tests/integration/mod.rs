//! Integration tests for blog-rs
//!
//! These tests run the real SeaORM repositories on in-memory SQLite and drive
//! the HTTP app without mocking.

pub mod api_tests;
pub mod category_path_tests;
pub mod database_tests;
pub mod permission_tree_tests;
pub mod rbac_tests;
pub mod service_tests;
