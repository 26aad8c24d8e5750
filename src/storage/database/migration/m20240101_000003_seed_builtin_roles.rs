use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::{self, ConnectionTrait};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let now = chrono::Utc::now().fixed_offset();

        let mut insert = Query::insert();
        insert.into_table(SysRoles::Table).columns([
            SysRoles::RoleId,
            SysRoles::RoleName,
            SysRoles::RoleKey,
            SysRoles::SortOrder,
            SysRoles::IsEnabled,
            SysRoles::IsBuiltin,
            SysRoles::Remark,
            SysRoles::CreatedAt,
            SysRoles::UpdatedAt,
        ]);

        // role 1 is the superuser, role 2 is given to every registered user
        for (id, name, key, remark) in [
            (1, "Super Administrator", "admin", "Bypasses every permission check"),
            (2, "User", "user", "Default role for registered users"),
        ] {
            insert
                .values([
                    id.into(),
                    name.into(),
                    key.into(),
                    id.into(),
                    true.into(),
                    true.into(),
                    remark.into(),
                    now.into(),
                    now.into(),
                ])
                .map_err(|e| DbErr::Migration(e.to_string()))?;
        }

        manager.exec_stmt(insert).await?;

        // explicit ids leave the postgres sequence behind
        if manager.get_database_backend() == sea_orm::DatabaseBackend::Postgres {
            manager
                .get_connection()
                .execute_unprepared(
                    "SELECT setval(pg_get_serial_sequence('sys_roles', 'role_id'), \
                     (SELECT MAX(role_id) FROM sys_roles))",
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let delete = Query::delete()
            .from_table(SysRoles::Table)
            .and_where(Expr::col(SysRoles::RoleId).is_in([1, 2]))
            .to_owned();

        manager.exec_stmt(delete).await
    }
}

#[derive(DeriveIden)]
enum SysRoles {
    Table,
    RoleId,
    RoleName,
    RoleKey,
    SortOrder,
    IsEnabled,
    IsBuiltin,
    Remark,
    CreatedAt,
    UpdatedAt,
}
