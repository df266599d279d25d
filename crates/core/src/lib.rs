//! Cartstore Core - Shared cart types.
//!
//! This crate provides the types shared by every cartstore component:
//! - `storefront` - Cart store, catalog client, storage backends and JSON API
//! - `cli` - Command-line access to a persisted cart
//!
//! # Architecture
//!
//! The core crate contains only types and pure operations - no I/O, no HTTP
//! clients, no storage access. Every cart operation here returns a new value
//! instead of mutating in place, so a caller can validate and persist the
//! result before making it visible.
//!
//! # Modules
//!
//! - [`types`] - Product identity, catalog metadata, stock levels and the cart

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
