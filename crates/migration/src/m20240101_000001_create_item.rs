//! Create the `item` table.
//! One row per inventory record; `last_modified` is epoch milliseconds.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Item::Table)
                    .if_not_exists()
                    .col(uuid(Item::Id).primary_key())
                    .col(string_len(Item::Name, 256).not_null())
                    .col(text_null(Item::Description))
                    .col(big_integer(Item::Quantity).not_null())
                    .col(string_len_null(Item::Category, 128))
                    .col(text_null(Item::Notes))
                    .col(boolean_null(Item::IsFragile))
                    .col(big_integer(Item::LastModified).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Item::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Item {
    Table,
    Id,
    Name,
    Description,
    Quantity,
    Category,
    Notes,
    IsFragile,
    LastModified,
}
