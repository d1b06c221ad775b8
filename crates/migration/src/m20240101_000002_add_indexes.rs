//! Secondary indexes over `item`: category-filtered listing,
//! recency-ordered listing, and name search each avoid a full scan.
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .name("idx_item_category")
                    .table(Item::Table)
                    .col(Item::Category)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_item_last_modified")
                    .table(Item::Table)
                    .col(Item::LastModified)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_item_name")
                    .table(Item::Table)
                    .col(Item::Name)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_item_category").table(Item::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_item_last_modified").table(Item::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_item_name").table(Item::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Item {
    Table,
    Category,
    LastModified,
    Name,
}
