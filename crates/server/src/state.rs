use std::sync::Arc;

use service::storage::KvStore;

/// Shared handler state; the store owns the connection pool handle.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn KvStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }
}
