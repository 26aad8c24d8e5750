use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CmsCategories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CmsCategories::CategoryId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CmsCategories::ParentId).integer().null())
                    .col(
                        ColumnDef::new(CmsCategories::CategoryName)
                            .string_len(64)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(CmsCategories::CategoryKey)
                            .string_len(64)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(CmsCategories::Path)
                            .string_len(255)
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(CmsCategories::Description).string_len(500).null())
                    .col(ColumnDef::new(CmsCategories::Icon).string_len(128).null())
                    .col(
                        ColumnDef::new(CmsCategories::SortOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(CmsCategories::IsVisible)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(CmsCategories::ArticleCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(CmsCategories::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CmsCategories::UpdatedAt)
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
                    .name("idx_cms_categories_parent_id")
                    .table(CmsCategories::Table)
                    .col(CmsCategories::ParentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_cms_categories_path")
                    .table(CmsCategories::Table)
                    .col(CmsCategories::Path)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CmsCategories::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum CmsCategories {
    Table,
    CategoryId,
    ParentId,
    CategoryName,
    CategoryKey,
    Path,
    Description,
    Icon,
    SortOrder,
    IsVisible,
    ArticleCount,
    CreatedAt,
    UpdatedAt,
}
