//! In-memory catalog.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use cartstore_core::{Product, ProductId, StockInfo};

use super::{Catalog, CatalogError};

/// Catalog held in process memory.
///
/// Clones share state, so stock levels can be changed after the catalog has
/// been handed to a store. Request counters make the number of lookups an
/// operation performed observable.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    state: Arc<RwLock<MemoryCatalogState>>,
    stock_requests: Arc<AtomicUsize>,
    product_requests: Arc<AtomicUsize>,
}

#[derive(Debug, Default)]
struct MemoryCatalogState {
    stock: HashMap<ProductId, i64>,
    products: HashMap<ProductId, Product>,
    unavailable: bool,
}

impl MemoryCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a product with a stock level.
    #[must_use]
    pub fn with_product(self, product: Product, stock: i64) -> Self {
        self.set_stock(product.id, stock);
        self.insert_product(product);
        self
    }

    /// Insert or replace product metadata.
    pub fn insert_product(&self, product: Product) {
        self.write().products.insert(product.id, product);
    }

    /// Set the stock level of a product.
    pub fn set_stock(&self, product_id: ProductId, amount: i64) {
        self.write().stock.insert(product_id, amount);
    }

    /// Make every request fail as if the service were down.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.write().unavailable = unavailable;
    }

    /// Number of stock lookups served so far.
    #[must_use]
    pub fn stock_requests(&self) -> usize {
        self.stock_requests.load(Ordering::SeqCst)
    }

    /// Number of product lookups served so far.
    #[must_use]
    pub fn product_requests(&self) -> usize {
        self.product_requests.load(Ordering::SeqCst)
    }

    fn read(&self) -> RwLockReadGuard<'_, MemoryCatalogState> {
        self.state
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, MemoryCatalogState> {
        self.state
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn check_available(&self) -> Result<(), CatalogError> {
        if self.read().unavailable {
            return Err(CatalogError::Status {
                status: 503,
                body: "catalog unavailable".to_string(),
            });
        }
        Ok(())
    }
}

impl Catalog for MemoryCatalog {
    async fn stock(&self, product_id: ProductId) -> Result<StockInfo, CatalogError> {
        self.stock_requests.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        self.read()
            .stock
            .get(&product_id)
            .map(|&amount| StockInfo::new(product_id, amount))
            .ok_or_else(|| CatalogError::NotFound(format!("stock/{product_id}")))
    }

    async fn product(&self, product_id: ProductId) -> Result<Product, CatalogError> {
        self.product_requests.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        self.read()
            .products
            .get(&product_id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(format!("products/{product_id}")))
    }
}
