//! Create `banner` table.
//! Titles carry a unique index, so the database backstops the
//! application-layer uniqueness check.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Banner::Table)
                    .if_not_exists()
                    .col(pk_auto(Banner::Id))
                    .col(string_len(Banner::Title, 256).not_null())
                    .col(text(Banner::Html).not_null())
                    .col(timestamp_with_time_zone(Banner::Created).not_null())
                    .col(timestamp_with_time_zone_null(Banner::Modified))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_banner_title_unique")
                    .table(Banner::Table)
                    .col(Banner::Title)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Banner::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Banner {
    Table,
    Id,
    Title,
    Html,
    Created,
    Modified,
}
