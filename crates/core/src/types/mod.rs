//! Core types for cartstore.

pub mod cart;
pub mod id;
pub mod product;

pub use cart::{Cart, CartInvariantError, LineItem};
pub use id::*;
pub use product::{Product, StockInfo};
