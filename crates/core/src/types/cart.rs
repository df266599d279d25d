//! Cart and line item types.
//!
//! A [`Cart`] is an immutable, ordered list of [`LineItem`]s. Every operation
//! that changes the cart returns a new `Cart`, leaving the original untouched.
//! The invariants below are checked on construction and on deserialization,
//! so a `Cart` value that exists is always valid:
//!
//! - at most one line item per product ID
//! - every amount is at least 1

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::id::ProductId;
use super::product::Product;

/// Errors raised when a list of line items is not a valid cart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartInvariantError {
    /// The same product appears on more than one line.
    #[error("product {0} appears more than once")]
    DuplicateProduct(ProductId),
    /// A line has an amount of zero.
    #[error("product {0} has a zero amount")]
    ZeroAmount(ProductId),
}

/// One product entry in the cart with its purchased quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Product metadata captured when the item was added.
    #[serde(flatten)]
    pub product: Product,
    /// Purchased quantity.
    pub amount: u32,
}

impl LineItem {
    /// Create a line item for `product`.
    #[must_use]
    pub const fn new(product: Product, amount: u32) -> Self {
        Self { product, amount }
    }

    /// The product ID of this line.
    #[must_use]
    pub const fn id(&self) -> ProductId {
        self.product.id
    }
}

/// An ordered list of line items, in the order products were first added.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<LineItem>", into = "Vec<LineItem>")]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a cart from line items, checking the cart invariants.
    ///
    /// # Errors
    ///
    /// Returns an error if a product ID repeats or an amount is zero.
    pub fn from_items(items: Vec<LineItem>) -> Result<Self, CartInvariantError> {
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if item.amount == 0 {
                return Err(CartInvariantError::ZeroAmount(item.id()));
            }
            if !seen.insert(item.id()) {
                return Err(CartInvariantError::DuplicateProduct(item.id()));
            }
        }
        Ok(Self { items })
    }

    /// The line items, in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Iterate over the line items.
    pub fn iter(&self) -> std::slice::Iter<'_, LineItem> {
        self.items.iter()
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.amount)).sum()
    }

    /// Find the line for `product_id`.
    #[must_use]
    pub fn get(&self, product_id: ProductId) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id() == product_id)
    }

    /// Current amount of `product_id`, or 0 when absent.
    #[must_use]
    pub fn amount_of(&self, product_id: ProductId) -> u32 {
        self.get(product_id).map_or(0, |item| item.amount)
    }

    /// Return a copy with `item` appended.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is already in the cart or the amount
    /// is zero.
    pub fn with_item(&self, item: LineItem) -> Result<Self, CartInvariantError> {
        if item.amount == 0 {
            return Err(CartInvariantError::ZeroAmount(item.id()));
        }
        if self.get(item.id()).is_some() {
            return Err(CartInvariantError::DuplicateProduct(item.id()));
        }
        let mut items = self.items.clone();
        items.push(item);
        Ok(Self { items })
    }

    /// Return a copy with the amount of `product_id` set to `amount`.
    ///
    /// Returns `None` if the product is not in the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if `amount` is zero.
    pub fn with_amount(
        &self,
        product_id: ProductId,
        amount: u32,
    ) -> Result<Option<Self>, CartInvariantError> {
        if amount == 0 {
            return Err(CartInvariantError::ZeroAmount(product_id));
        }
        let Some(index) = self.position(product_id) else {
            return Ok(None);
        };
        let mut items = self.items.clone();
        if let Some(item) = items.get_mut(index) {
            item.amount = amount;
        }
        Ok(Some(Self { items }))
    }

    /// Return a copy without the line for `product_id`.
    ///
    /// Returns `None` if the product is not in the cart.
    #[must_use]
    pub fn without(&self, product_id: ProductId) -> Option<Self> {
        let index = self.position(product_id)?;
        let mut items = self.items.clone();
        items.remove(index);
        Some(Self { items })
    }

    fn position(&self, product_id: ProductId) -> Option<usize> {
        self.items.iter().position(|item| item.id() == product_id)
    }
}

impl TryFrom<Vec<LineItem>> for Cart {
    type Error = CartInvariantError;

    fn try_from(items: Vec<LineItem>) -> Result<Self, Self::Error> {
        Self::from_items(items)
    }
}

impl From<Cart> for Vec<LineItem> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a LineItem;
    type IntoIter = std::slice::Iter<'a, LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(id: i32, amount: u32) -> LineItem {
        LineItem::new(Product::new(ProductId::new(id), format!("Product {id}")), amount)
    }

    #[test]
    fn test_with_item_appends_in_order() {
        let cart = Cart::new().with_item(item(2, 1)).unwrap();
        let cart = cart.with_item(item(1, 1)).unwrap();

        let ids: Vec<_> = cart.iter().map(LineItem::id).collect();
        assert_eq!(ids, vec![ProductId::new(2), ProductId::new(1)]);
    }

    #[test]
    fn test_with_item_rejects_duplicate() {
        let cart = Cart::new().with_item(item(1, 1)).unwrap();
        assert_eq!(
            cart.with_item(item(1, 1)),
            Err(CartInvariantError::DuplicateProduct(ProductId::new(1)))
        );
    }

    #[test]
    fn test_with_amount_leaves_original_untouched() {
        let cart = Cart::new().with_item(item(1, 1)).unwrap();
        let updated = cart.with_amount(ProductId::new(1), 5).unwrap().unwrap();

        assert_eq!(cart.amount_of(ProductId::new(1)), 1);
        assert_eq!(updated.amount_of(ProductId::new(1)), 5);
    }

    #[test]
    fn test_with_amount_missing_product() {
        let cart = Cart::new().with_item(item(1, 1)).unwrap();
        assert_eq!(cart.with_amount(ProductId::new(9), 2), Ok(None));
    }

    #[test]
    fn test_with_amount_rejects_zero() {
        let cart = Cart::new().with_item(item(1, 1)).unwrap();
        assert!(cart.with_amount(ProductId::new(1), 0).is_err());
    }

    #[test]
    fn test_without() {
        let cart = Cart::from_items(vec![item(1, 1), item(2, 3), item(3, 1)]).unwrap();
        let removed = cart.without(ProductId::new(2)).unwrap();

        assert_eq!(removed.len(), 2);
        assert!(removed.get(ProductId::new(2)).is_none());
        assert_eq!(cart.len(), 3);
        assert!(cart.without(ProductId::new(7)).is_none());
    }

    #[test]
    fn test_item_count() {
        let cart = Cart::from_items(vec![item(1, 2), item(2, 3)]).unwrap();
        assert_eq!(cart.item_count(), 5);
        assert_eq!(Cart::new().item_count(), 0);
    }

    #[test]
    fn test_cart_serializes_as_array() {
        let cart = Cart::from_items(vec![item(42, 3)]).unwrap();
        let value = serde_json::to_value(&cart).unwrap();
        assert_eq!(
            value,
            json!([{ "id": 42, "name": "Product 42", "amount": 3 }])
        );
    }

    #[test]
    fn test_deserialize_rejects_invalid_carts() {
        let duplicate = json!([
            { "id": 1, "name": "A", "amount": 1 },
            { "id": 1, "name": "A", "amount": 2 }
        ]);
        assert!(serde_json::from_value::<Cart>(duplicate).is_err());

        let zero = json!([{ "id": 1, "name": "A", "amount": 0 }]);
        assert!(serde_json::from_value::<Cart>(zero).is_err());

        let negative = json!([{ "id": 1, "name": "A", "amount": -1 }]);
        assert!(serde_json::from_value::<Cart>(negative).is_err());
    }

    #[test]
    fn test_deserialize_storage_format() {
        let stored = r#"[{"id":1,"title":"Tênis","price":139.9,"image":"https://x/1.jpg","amount":2}]"#;
        let cart: Cart = serde_json::from_str(stored).unwrap();
        let line = cart.get(ProductId::new(1)).unwrap();

        assert_eq!(line.amount, 2);
        assert_eq!(line.product.name, "Tênis");
        assert_eq!(line.product.image_url.as_deref(), Some("https://x/1.jpg"));

        let rewritten = serde_json::to_value(&cart).unwrap();
        assert_eq!(rewritten[0]["price"], json!(139.9));
    }
}
