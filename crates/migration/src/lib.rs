//! Migrator registering the key-value schema in dependency order.
//! Indexes are applied after the tables, the seed user last.
pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_users;
mod m20240101_000002_create_entries;
mod m20240101_000003_add_indexes;
mod m20240101_000004_seed_default_user;

/// Owner of every entry in a single-tenant deployment.
pub const DEFAULT_USER_ID: i32 = 1;
pub const DEFAULT_USER_EMAIL: &str = "default@local";

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_users::Migration),
            Box::new(m20240101_000002_create_entries::Migration),
            Box::new(m20240101_000003_add_indexes::Migration),
            Box::new(m20240101_000004_seed_default_user::Migration),
        ]
    }
}
