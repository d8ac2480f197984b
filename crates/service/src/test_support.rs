#![cfg(test)]
use configs::DatabaseConfig;
use models::db::connect_with_config;
use sea_orm::DatabaseConnection;

use crate::schema::initialize_schema;

/// Fresh in-memory SQLite pool without schema.
pub async fn connect_memory() -> Result<DatabaseConnection, anyhow::Error> {
    // Each SQLite memory connection is its own database; keep exactly one
    let cfg = DatabaseConfig {
        url: "sqlite::memory:".into(),
        max_connections: 1,
        min_connections: 1,
        ..DatabaseConfig::default()
    };
    connect_with_config(&cfg).await
}

/// Fresh in-memory SQLite pool with the schema and seed user in place.
pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    let db = connect_memory().await?;
    initialize_schema(&db).await?;
    Ok(db)
}
