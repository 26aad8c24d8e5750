use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SysPermissions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SysPermissions::PermId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SysPermissions::PermName).string_len(64).not_null())
                    .col(
                        ColumnDef::new(SysPermissions::PermKey)
                            .string_len(128)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(SysPermissions::PermType).integer().not_null())
                    .col(ColumnDef::new(SysPermissions::ParentId).integer().null())
                    .col(ColumnDef::new(SysPermissions::Path).string_len(255).null())
                    .col(ColumnDef::new(SysPermissions::Component).string_len(255).null())
                    .col(ColumnDef::new(SysPermissions::Icon).string_len(128).null())
                    .col(ColumnDef::new(SysPermissions::ApiPath).string_len(255).null())
                    .col(
                        ColumnDef::new(SysPermissions::SortOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(SysPermissions::IsVisible)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(SysPermissions::IsEnabled)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(SysPermissions::IsBuiltin)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(SysPermissions::Remark).string_len(500).null())
                    .col(
                        ColumnDef::new(SysPermissions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SysPermissions::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_sys_permissions_parent_id")
                    .table(SysPermissions::Table)
                    .col(SysPermissions::ParentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SysRoles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SysRoles::RoleId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SysRoles::RoleName)
                            .string_len(64)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(SysRoles::RoleKey)
                            .string_len(64)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(SysRoles::SortOrder).integer().not_null().default(0))
                    .col(
                        ColumnDef::new(SysRoles::IsEnabled)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(SysRoles::IsBuiltin)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(SysRoles::Remark).string_len(500).null())
                    .col(
                        ColumnDef::new(SysRoles::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SysRoles::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SysUsers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SysUsers::UserId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SysUsers::Username)
                            .string_len(64)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(SysUsers::PasswordHash).string_len(255).not_null())
                    .col(ColumnDef::new(SysUsers::Email).string_len(128).null().unique_key())
                    .col(ColumnDef::new(SysUsers::Nickname).string_len(64).null())
                    .col(ColumnDef::new(SysUsers::Avatar).string_len(255).null())
                    .col(
                        ColumnDef::new(SysUsers::IsEnabled)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(SysUsers::LastLoginAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(SysUsers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SysUsers::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SysUserRoles::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(SysUserRoles::UserId).integer().not_null())
                    .col(ColumnDef::new(SysUserRoles::RoleId).integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(SysUserRoles::UserId)
                            .col(SysUserRoles::RoleId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sys_user_roles_user_id")
                            .from(SysUserRoles::Table, SysUserRoles::UserId)
                            .to(SysUsers::Table, SysUsers::UserId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sys_user_roles_role_id")
                            .from(SysUserRoles::Table, SysUserRoles::RoleId)
                            .to(SysRoles::Table, SysRoles::RoleId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SysRolePermissions::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(SysRolePermissions::RoleId).integer().not_null())
                    .col(ColumnDef::new(SysRolePermissions::PermId).integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(SysRolePermissions::RoleId)
                            .col(SysRolePermissions::PermId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sys_role_permissions_role_id")
                            .from(SysRolePermissions::Table, SysRolePermissions::RoleId)
                            .to(SysRoles::Table, SysRoles::RoleId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sys_role_permissions_perm_id")
                            .from(SysRolePermissions::Table, SysRolePermissions::PermId)
                            .to(SysPermissions::Table, SysPermissions::PermId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_sys_role_permissions_perm_id")
                    .table(SysRolePermissions::Table)
                    .col(SysRolePermissions::PermId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SysRolePermissions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SysUserRoles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SysUsers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SysRoles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SysPermissions::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum SysPermissions {
    Table,
    PermId,
    PermName,
    PermKey,
    PermType,
    ParentId,
    Path,
    Component,
    Icon,
    ApiPath,
    SortOrder,
    IsVisible,
    IsEnabled,
    IsBuiltin,
    Remark,
    CreatedAt,
    UpdatedAt,
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

#[derive(DeriveIden)]
enum SysUsers {
    Table,
    UserId,
    Username,
    PasswordHash,
    Email,
    Nickname,
    Avatar,
    IsEnabled,
    LastLoginAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum SysUserRoles {
    Table,
    UserId,
    RoleId,
}

#[derive(DeriveIden)]
enum SysRolePermissions {
    Table,
    RoleId,
    PermId,
}
