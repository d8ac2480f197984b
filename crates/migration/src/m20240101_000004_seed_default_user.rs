//! Insert the default user that owns every entry.
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::{ConnectionTrait, DatabaseBackend};

use crate::{DEFAULT_USER_EMAIL, DEFAULT_USER_ID};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut insert = Query::insert();
        insert
            .into_table(Users::Table)
            .columns([Users::Id, Users::Email])
            .values([DEFAULT_USER_ID.into(), DEFAULT_USER_EMAIL.into()])
            .map_err(|e| DbErr::Custom(e.to_string()))?;
        // Re-running against a pre-seeded database must not fail
        insert.on_conflict(
            OnConflict::column(Users::Id)
                .update_column(Users::Email)
                .to_owned(),
        );
        manager.exec_stmt(insert).await?;

        // An explicit id does not advance a Postgres serial; move it past the seed
        if manager.get_database_backend() == DatabaseBackend::Postgres {
            manager
                .get_connection()
                .execute_unprepared(
                    "SELECT setval(pg_get_serial_sequence('users', 'id'), \
                     GREATEST((SELECT MAX(id) FROM users), 1))",
                )
                .await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let delete = Query::delete()
            .from_table(Users::Table)
            .and_where(Expr::col(Users::Id).eq(DEFAULT_USER_ID))
            .to_owned();
        manager.exec_stmt(delete).await
    }
}

#[derive(DeriveIden)]
enum Users { Table, Id, Email }
