//! The cart store.
//!
//! [`CartStore`] owns the cart, validates quantity changes against the
//! catalog, and mirrors every committed cart into storage.
//!
//! # Consistency
//!
//! - Copy-on-write: an operation builds a new [`Cart`] from the current
//!   snapshot, persists it, and only then swaps it in. A failure at any step
//!   leaves the committed cart exactly as it was.
//! - Single writer: operations are serialized, so two overlapping adds for
//!   the same product cannot both read the same starting amount.
//! - Readers never wait for the writer; [`CartStore::snapshot`] and
//!   [`CartStore::subscribe`] see the last committed cart.
//!
//! # Failures
//!
//! The public operations never return an error. A rejected operation is
//! logged, broadcast as a [`Notification`], and returned to the caller as
//! that same notification.
//!
//! # Example
//!
//! ```rust,ignore
//! let store = CartStore::load(catalog, storage, "RocketShoes").await;
//!
//! store.add_product(ProductId::new(42)).await;
//! if let Some(toast) = store.add_product(ProductId::new(42)).await {
//!     show_toast(toast.message);
//! }
//! ```

mod error;
mod notification;

pub use error::CartError;
pub use notification::{Notification, NotificationKind};

use std::sync::Arc;

use cartstore_core::{Cart, LineItem, ProductId};
use serde::Deserialize;
use tokio::sync::{Mutex, broadcast, watch};
use tracing::{debug, info, instrument, warn};

use crate::catalog::Catalog;
use crate::storage::{CartStorage, StorageError, cart_key};

/// Capacity of the notification channel per subscriber.
const NOTIFICATION_CAPACITY: usize = 64;

/// Arguments of [`CartStore::update_product_amount`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct UpdateProductAmount {
    /// Product whose line changes.
    #[serde(alias = "productId")]
    pub product_id: ProductId,
    /// Requested amount; zero or negative is ignored.
    pub amount: i64,
}

/// Shared handle to a cart.
///
/// Cheaply cloneable; clones operate on the same cart.
pub struct CartStore<C, S> {
    inner: Arc<CartStoreInner<C, S>>,
}

struct CartStoreInner<C, S> {
    catalog: C,
    storage: S,
    key: String,
    cart: watch::Sender<Arc<Cart>>,
    notifications: broadcast::Sender<Notification>,
    writer: Mutex<()>,
}

impl<C, S> Clone for CartStore<C, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: Catalog, S: CartStorage> CartStore<C, S> {
    /// Create a store, loading the persisted cart for `namespace`.
    ///
    /// A missing value gives an empty cart. A value that cannot be read or
    /// is not a valid cart is logged and replaced by an empty cart; it is not
    /// overwritten until the next successful operation.
    #[instrument(skip(catalog, storage))]
    pub async fn load(catalog: C, storage: S, namespace: &str) -> Self {
        let key = cart_key(namespace);
        let cart = load_cart(&storage, &key).await;
        info!(items = cart.len(), "Cart loaded");

        let (notifications, _) = broadcast::channel(NOTIFICATION_CAPACITY);

        Self {
            inner: Arc::new(CartStoreInner {
                catalog,
                storage,
                key,
                cart: watch::Sender::new(Arc::new(cart)),
                notifications,
                writer: Mutex::new(()),
            }),
        }
    }

    /// The last committed cart.
    #[must_use]
    pub fn snapshot(&self) -> Arc<Cart> {
        Arc::clone(&self.inner.cart.borrow())
    }

    /// Watch committed carts. The receiver yields a new value after every
    /// successful operation.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Arc<Cart>> {
        self.inner.cart.subscribe()
    }

    /// Receive notifications raised by failed operations.
    #[must_use]
    pub fn notifications(&self) -> broadcast::Receiver<Notification> {
        self.inner.notifications.subscribe()
    }

    /// The catalog this store validates against.
    #[must_use]
    pub fn catalog(&self) -> &C {
        &self.inner.catalog
    }

    /// The storage this store persists to.
    #[must_use]
    pub fn storage(&self) -> &S {
        &self.inner.storage
    }

    /// Storage key of the persisted cart.
    #[must_use]
    pub fn storage_key(&self) -> &str {
        &self.inner.key
    }

    /// Add one unit of a product.
    ///
    /// A product not yet in the cart is appended with amount 1 and the
    /// metadata the catalog returns for it.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add_product(&self, product_id: ProductId) -> Option<Notification> {
        let _writer = self.inner.writer.lock().await;
        let result = self.try_add_product(product_id).await;
        self.settle(result, product_id, NotificationKind::AddFailed)
    }

    /// Remove a product's line from the cart.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn remove_product(&self, product_id: ProductId) -> Option<Notification> {
        let _writer = self.inner.writer.lock().await;
        let result = self.try_remove_product(product_id).await;
        self.settle(result, product_id, NotificationKind::RemoveFailed)
    }

    /// Set a product's amount.
    ///
    /// An amount of zero or less is ignored without a notification.
    #[instrument(skip(self), fields(product_id = %update.product_id, amount = update.amount))]
    pub async fn update_product_amount(
        &self,
        update: UpdateProductAmount,
    ) -> Option<Notification> {
        if update.amount <= 0 {
            debug!("Ignoring non-positive amount");
            return None;
        }

        let _writer = self.inner.writer.lock().await;
        let result = self.try_update_product_amount(update).await;
        self.settle(result, update.product_id, NotificationKind::UpdateFailed)
    }

    async fn try_add_product(&self, product_id: ProductId) -> Result<(), CartError> {
        let current = self.snapshot();
        let stock = self.inner.catalog.stock(product_id).await?;

        let candidate = current.amount_of(product_id).saturating_add(1);
        if !stock.allows(i64::from(candidate)) {
            return Err(CartError::StockExceeded {
                product_id,
                requested: i64::from(candidate),
                available: stock.amount,
            });
        }

        let next = if current.get(product_id).is_some() {
            current
                .with_amount(product_id, candidate)?
                .ok_or(CartError::ItemNotFound(product_id))?
        } else {
            let product = self.inner.catalog.product(product_id).await?;
            current.with_item(LineItem::new(product, 1))?
        };

        self.commit(next).await
    }

    async fn try_remove_product(&self, product_id: ProductId) -> Result<(), CartError> {
        let next = self
            .snapshot()
            .without(product_id)
            .ok_or(CartError::ItemNotFound(product_id))?;

        self.commit(next).await
    }

    async fn try_update_product_amount(
        &self,
        update: UpdateProductAmount,
    ) -> Result<(), CartError> {
        let UpdateProductAmount { product_id, amount } = update;
        let stock = self.inner.catalog.stock(product_id).await?;

        if !stock.allows(amount) {
            return Err(CartError::StockExceeded {
                product_id,
                requested: amount,
                available: stock.amount,
            });
        }
        let amount = u32::try_from(amount).map_err(|_| CartError::AmountOutOfRange {
            product_id,
            requested: amount,
        })?;

        let next = self
            .snapshot()
            .with_amount(product_id, amount)?
            .ok_or(CartError::ItemNotFound(product_id))?;

        self.commit(next).await
    }

    /// Persist `next` and make it the committed cart.
    async fn commit(&self, next: Cart) -> Result<(), CartError> {
        let serialized = serde_json::to_string(&next).map_err(StorageError::from)?;
        self.inner.storage.set(&self.inner.key, serialized).await?;

        debug!(items = next.len(), units = next.item_count(), "Cart committed");
        self.inner.cart.send_replace(Arc::new(next));
        Ok(())
    }

    /// Turn an operation result into the notification the caller sees.
    fn settle(
        &self,
        result: Result<(), CartError>,
        product_id: ProductId,
        failure: NotificationKind,
    ) -> Option<Notification> {
        let err = result.err()?;

        let kind = match &err {
            CartError::StockExceeded { .. } => {
                info!(error = %err, "Cart operation rejected");
                NotificationKind::StockExceeded
            }
            CartError::ItemNotFound(_) | CartError::AmountOutOfRange { .. } => {
                info!(error = %err, "Cart operation rejected");
                failure
            }
            CartError::Catalog(_) | CartError::Storage(_) | CartError::Invariant(_) => {
                warn!(error = %err, "Cart operation failed");
                failure
            }
        };

        let notification = Notification::new(kind, product_id);
        // No subscribers is fine; the caller still gets the notification.
        let _ = self.inner.notifications.send(notification.clone());
        Some(notification)
    }
}

/// Read the persisted cart, falling back to an empty cart.
async fn load_cart<S: CartStorage>(storage: &S, key: &str) -> Cart {
    let stored = match storage.get(key).await {
        Ok(Some(stored)) => stored,
        Ok(None) => return Cart::new(),
        Err(e) => {
            warn!(error = %e, key, "Failed to read stored cart, starting empty");
            return Cart::new();
        }
    };

    match serde_json::from_str::<Cart>(&stored) {
        Ok(cart) => cart,
        Err(e) => {
            warn!(
                error = %e,
                key,
                stored = %stored.chars().take(200).collect::<String>(),
                "Stored cart is corrupt, starting empty"
            );
            Cart::new()
        }
    }
}
