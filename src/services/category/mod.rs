//! Category administration over materialized paths

mod service;


pub use service::CategoryService;
