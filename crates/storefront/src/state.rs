//! Application state shared across handlers.

use std::sync::Arc;

use crate::catalog::{Catalog, CatalogError, HttpCatalog};
use crate::config::CartConfig;
use crate::storage::{CartStorage, FileStorage};
use crate::store::CartStore;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Generic over the catalog and storage so the
/// routes can be exercised against in-memory collaborators; the binary uses
/// the defaults.
pub struct AppState<C = HttpCatalog, S = FileStorage> {
    inner: Arc<AppStateInner<C, S>>,
}

struct AppStateInner<C, S> {
    store: CartStore<C, S>,
}

impl<C, S> Clone for AppState<C, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl AppState {
    /// Build the state from configuration, loading the persisted cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog HTTP client cannot be built.
    pub async fn from_config(config: &CartConfig) -> Result<Self, CatalogError> {
        let catalog = HttpCatalog::new(&config.catalog)?;
        let storage = FileStorage::new(&config.storage.dir);
        let store = CartStore::load(catalog, storage, &config.storage.namespace).await;
        Ok(Self::new(store))
    }
}

impl<C: Catalog, S: CartStorage> AppState<C, S> {
    /// Wrap an existing store.
    #[must_use]
    pub fn new(store: CartStore<C, S>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { store }),
        }
    }

    /// Get a reference to the cart store.
    #[must_use]
    pub fn store(&self) -> &CartStore<C, S> {
        &self.inner.store
    }
}
