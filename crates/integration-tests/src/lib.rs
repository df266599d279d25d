//! Integration tests for cartstore.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p cartstore-integration-tests
//! ```
//!
//! No external services are needed: the catalog is served by a local
//! `mockito` server and the cart is persisted to a temporary directory.
//!
//! # Test Categories
//!
//! - `http_catalog` - Catalog client against a mock catalog service
//! - `file_storage` - Cart persistence on disk
//! - `cart_flow` - The cart store wired to the HTTP catalog and file storage

#![cfg_attr(not(test), forbid(unsafe_code))]

use cartstore_storefront::catalog::HttpCatalog;
use cartstore_storefront::config::CatalogConfig;

/// Build an [`HttpCatalog`] pointed at a mock server URL.
///
/// # Panics
///
/// Panics if `url` is not a valid base URL.
#[must_use]
#[allow(clippy::expect_used)]
pub fn catalog_for(url: &str) -> HttpCatalog {
    let config = CatalogConfig::new(url).expect("mock server URL is valid");
    HttpCatalog::new(&config).expect("HTTP client builds")
}

/// JSON body of `GET products/{id}` for a catalog product.
#[must_use]
pub fn product_body(id: i32, title: &str, price: f64) -> String {
    serde_json::json!({
        "id": id,
        "title": title,
        "price": price,
        "image": format!("https://rocketseat-cdn.s3-sa-east-1.amazonaws.com/tenis{id}.jpg"),
    })
    .to_string()
}

/// JSON body of `GET stock/{id}`.
#[must_use]
pub fn stock_body(id: i32, amount: i64) -> String {
    serde_json::json!({ "id": id, "amount": amount }).to_string()
}
