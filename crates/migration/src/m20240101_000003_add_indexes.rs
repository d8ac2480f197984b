use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Entries: composite unique (user_id, data_key); upserts resolve conflicts on it
        manager
            .create_index(
                Index::create()
                    .name("unique_user_key")
                    .table(Entries::Table)
                    .col(Entries::UserId)
                    .col(Entries::DataKey)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Entries: lookup index for per-user scans
        manager
            .create_index(
                Index::create()
                    .name("idx_entries_user_key")
                    .table(Entries::Table)
                    .col(Entries::UserId)
                    .col(Entries::DataKey)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_entries_user_key").table(Entries::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("unique_user_key").table(Entries::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Entries { Table, UserId, DataKey }
