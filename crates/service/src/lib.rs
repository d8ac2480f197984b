//! Service layer: the key-value data-access contract on top of `models`.
//! - `storage` exposes the user-scoped key-value operations.
//! - `schema` prepares the database before the store is used.

pub mod errors;
pub mod schema;
pub mod storage;
#[cfg(test)]
pub mod test_support;
