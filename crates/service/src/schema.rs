//! Schema bootstrap.

use migration::{Migrator, MigratorTrait};
use sea_orm::{DatabaseConnection, TransactionTrait};
use tracing::{error, info};

use crate::errors::ServiceError;

/// Create users, entries, their indexes and the seed user if missing.
///
/// Runs every pending migration inside one transaction; any failure rolls the
/// whole batch back. Safe to call on every startup.
pub async fn initialize_schema(db: &DatabaseConnection) -> Result<(), ServiceError> {
    let txn = db.begin().await?;
    if let Err(e) = Migrator::up(&txn, None).await {
        error!(event = "schema_init_failed", error = %e, "rolling back schema initialization");
        if let Err(rb) = txn.rollback().await {
            error!(event = "schema_rollback_failed", error = %rb, "rollback failed");
        }
        return Err(e.into());
    }
    txn.commit().await?;
    info!(event = "schema_ready", "database schema initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::connect_memory;
    use models::user;
    use sea_orm::{ConnectionTrait, DatabaseBackend, EntityTrait, Statement};

    async fn table_names(db: &DatabaseConnection) -> Result<Vec<String>, anyhow::Error> {
        let rows = db
            .query_all(Statement::from_string(
                DatabaseBackend::Sqlite,
                "SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name",
            ))
            .await?;
        let mut names = Vec::new();
        for row in rows {
            names.push(row.try_get::<String>("", "name")?);
        }
        Ok(names)
    }

    #[tokio::test]
    async fn initialize_twice_keeps_single_seed_user() -> Result<(), anyhow::Error> {
        let db = connect_memory().await?;
        initialize_schema(&db).await?;
        initialize_schema(&db).await?;

        let users = user::Entity::find().all(&db).await?;
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].id, user::DEFAULT_USER_ID);
        assert_eq!(users[0].email, user::DEFAULT_USER_EMAIL);
        Ok(())
    }

    #[tokio::test]
    async fn failed_initialization_leaves_nothing_behind() -> Result<(), anyhow::Error> {
        let db = connect_memory().await?;
        // A foreign row already holding the seed email makes the seed step fail
        // after the entries table and indexes were created
        db.execute_unprepared(
            "CREATE TABLE users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                email VARCHAR(255) NOT NULL UNIQUE,
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            )",
        )
        .await?;
        db.execute_unprepared("INSERT INTO users (id, email) VALUES (2, 'default@local')")
            .await?;

        assert!(initialize_schema(&db).await.is_err());

        let tables = table_names(&db).await?;
        assert!(tables.contains(&"users".to_string()));
        assert!(!tables.contains(&"entries".to_string()), "tables left: {tables:?}");
        assert!(!tables.contains(&"seaql_migrations".to_string()), "tables left: {tables:?}");

        let users = user::Entity::find().all(&db).await?;
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].id, 2);
        Ok(())
    }
}
