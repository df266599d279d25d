//! Catalog product metadata and stock levels.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::id::ProductId;

/// Product metadata as returned by the catalog service.
///
/// Captured once when the product is first added to a cart. Fields the
/// catalog returns that are not modelled here are kept in `extra` so that
/// persisting and reloading a cart never drops data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Catalog product ID.
    pub id: ProductId,
    /// Display name.
    #[serde(alias = "title")]
    pub name: String,
    /// Unit price at the time the product was added. Written back as a JSON
    /// number, the way the catalog sends it.
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<Decimal>,
    /// Product image URL.
    #[serde(
        default,
        rename = "imageUrl",
        alias = "image",
        alias = "image_url",
        skip_serializing_if = "Option::is_none"
    )]
    pub image_url: Option<String>,
    /// Any other catalog fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Product {
    /// Create a product with only the required fields set.
    #[must_use]
    pub fn new(id: ProductId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            price: None,
            image_url: None,
            extra: Map::new(),
        }
    }
}

/// Stock level for a product.
///
/// Always fetched fresh for a single validation and never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockInfo {
    /// Product the stock level belongs to.
    pub product_id: ProductId,
    /// Maximum purchasable quantity.
    pub amount: i64,
}

impl StockInfo {
    /// Create a stock level.
    #[must_use]
    pub const fn new(product_id: ProductId, amount: i64) -> Self {
        Self { product_id, amount }
    }

    /// Whether `requested` units can be purchased.
    #[must_use]
    pub const fn allows(&self, requested: i64) -> bool {
        requested <= self.amount
    }
}
