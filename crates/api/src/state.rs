//! Application state

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use common::Config;
use engine::{Catalog, Tracker};
use store::retry::RetryPolicy;
use store::StoreHandle;

/// Shared application state
pub struct AppState {
    pub config: Config,
    pub store: StoreHandle,
    /// Snapshot swapped out when admin CRUD changes the catalog
    catalog: RwLock<Arc<Catalog>>,
}

impl AppState {
    pub fn new(config: Config, store: StoreHandle, catalog: Arc<Catalog>) -> Self {
        Self {
            config,
            store,
            catalog: RwLock::new(catalog),
        }
    }

    pub async fn catalog(&self) -> Arc<Catalog> {
        self.catalog.read().await.clone()
    }

    pub async fn replace_catalog(&self, catalog: Arc<Catalog>) {
        *self.catalog.write().await = catalog;
    }

    pub fn retry(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.config.store_retry_attempts,
            Duration::from_millis(self.config.store_retry_base_ms),
        )
    }

    /// Tracker bound to the current catalog snapshot
    pub async fn tracker(&self) -> Tracker {
        Tracker::new(self.store.clone(), self.catalog().await, self.retry())
    }
}
