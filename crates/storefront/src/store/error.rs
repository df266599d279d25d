//! Cart operation errors.

use cartstore_core::{CartInvariantError, ProductId};
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::storage::StorageError;

/// Why a cart operation was rejected.
///
/// These never escape the store's public operations; they are logged and
/// turned into a [`Notification`](super::Notification).
#[derive(Debug, Error)]
pub enum CartError {
    /// Requested amount is above the available stock.
    #[error("Requested {requested} of product {product_id}, only {available} in stock")]
    StockExceeded {
        /// Product the operation targeted.
        product_id: ProductId,
        /// Amount the cart line would have had.
        requested: i64,
        /// Stock level reported by the catalog.
        available: i64,
    },

    /// Product is not in the cart.
    #[error("Product {0} is not in the cart")]
    ItemNotFound(ProductId),

    /// Catalog lookup failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Persisting the cart failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The requested amount does not fit a cart line.
    #[error("Requested {requested} of product {product_id}, more than a cart line can hold")]
    AmountOutOfRange {
        /// Product the operation targeted.
        product_id: ProductId,
        /// Amount the caller asked for.
        requested: i64,
    },

    /// The resulting cart would be invalid.
    #[error("Invalid cart: {0}")]
    Invariant(#[from] CartInvariantError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_error_display() {
        let err = CartError::StockExceeded {
            product_id: ProductId::new(42),
            requested: 4,
            available: 3,
        };
        assert_eq!(
            err.to_string(),
            "Requested 4 of product 42, only 3 in stock"
        );

        let err = CartError::ItemNotFound(ProductId::new(7));
        assert_eq!(err.to_string(), "Product 7 is not in the cart");
    }
}
