//! Key-value storage for JSON documents.
//!
//! `KvStore` is the contract the HTTP layer talks to; `EntryStore` is the
//! SeaORM-backed implementation over the `entries` table.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::errors::ServiceError;

pub mod entry_store;

pub use entry_store::EntryStore;

/// User-scoped key → JSON value storage.
///
/// Writes are last-write-wins: concurrent `set` calls on one key leave exactly
/// one of the written values behind, but which one is not defined.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Value stored under `key`, or `None` when nothing was written.
    async fn get(&self, key: &str) -> Result<Option<Value>, ServiceError>;
    /// Insert or replace the value under `key`.
    async fn set(&self, key: &str, value: Value) -> Result<(), ServiceError>;
    async fn get_all(&self) -> Result<Map<String, Value>, ServiceError>;
    /// Remove `key`; removing a missing key succeeds.
    async fn delete(&self, key: &str) -> Result<(), ServiceError>;
}
