use sea_orm_migration::prelude::*;

mod m20240101_000001_create_rbac_tables;
mod m20240101_000002_create_categories_table;
mod m20240101_000003_seed_builtin_roles;

/// Database migrator for SeaORM
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_rbac_tables::Migration),
            Box::new(m20240101_000002_create_categories_table::Migration),
            Box::new(m20240101_000003_seed_builtin_roles::Migration),
        ]
    }
}
