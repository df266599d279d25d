//! Cartstore Storefront library.
//!
//! The cart store and everything it talks to, as a library so the HTTP
//! binary, the CLI and the integration tests share one implementation.
//!
//! # Modules
//!
//! - [`store`] - `CartStore`: validated, persisted cart operations
//! - [`catalog`] - Catalog service clients (HTTP and in-memory)
//! - [`storage`] - Key-value persistence (file and in-memory)
//! - [`config`] - Environment configuration
//! - [`routes`] / [`state`] / [`error`] - JSON API over a store

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod storage;
pub mod store;
