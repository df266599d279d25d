//! Catalog service clients.
//!
//! The catalog is the read-only source of product metadata and stock
//! levels. The cart store only depends on the [`Catalog`] trait, so tests can
//! run against [`MemoryCatalog`] while the binaries use [`HttpCatalog`].
//!
//! # Caching
//!
//! Product metadata is cached by [`HttpCatalog`] via `moka`. Stock levels are
//! never cached: every validation fetches a fresh value.

mod http;
mod memory;

pub use http::HttpCatalog;
pub use memory::MemoryCatalog;

use std::future::Future;

use cartstore_core::{Product, ProductId, StockInfo};
use thiserror::Error;

/// Errors that can occur when talking to the catalog service.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Request URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Catalog answered with a non-success status.
    #[error("Catalog returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Leading part of the response body.
        body: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Catalog answered with metadata for a different product.
    #[error("Requested product {requested} but catalog returned {returned}")]
    UnexpectedProduct {
        /// Product that was asked for.
        requested: ProductId,
        /// Product in the response body.
        returned: ProductId,
    },

    /// Rate limited by the catalog.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),
}

/// Read-only access to product metadata and stock levels.
pub trait Catalog: Send + Sync + 'static {
    /// Fetch the current stock level of a product.
    fn stock(
        &self,
        product_id: ProductId,
    ) -> impl Future<Output = Result<StockInfo, CatalogError>> + Send;

    /// Fetch product metadata.
    fn product(
        &self,
        product_id: ProductId,
    ) -> impl Future<Output = Result<Product, CatalogError>> + Send;
}
