//! Create `entries` table with FK to `users`.
//!
//! One row per (user, key); `data_value` holds an arbitrary JSON document.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Entries::Table)
                    .if_not_exists()
                    .col(integer(Entries::Id).primary_key().auto_increment())
                    .col(integer(Entries::UserId).not_null().default(crate::DEFAULT_USER_ID))
                    .col(string_len(Entries::DataKey, 255).not_null())
                    .col(json(Entries::DataValue).not_null())
                    .col(
                        timestamp_with_time_zone(Entries::UpdatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_entries_user")
                            .from(Entries::Table, Entries::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Entries::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Entries { Table, Id, UserId, DataKey, DataValue, UpdatedAt }

#[derive(DeriveIden)]
enum Users { Table, Id }
