//! Persistence layer for the cart.
//!
//! A [`CartStorage`] is a string key-value store, the durable stand-in for
//! browser local storage. The cart is stored in full, as a JSON array, under a
//! namespace-scoped key (see [`cart_key`]).
//!
//! - [`MemoryStorage`] - in-process map, for tests and throwaway sessions
//! - [`FileStorage`] - one file per key in a directory, replaced atomically

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use std::future::Future;

use thiserror::Error;

/// Errors that can occur when reading or writing storage.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Value could not be serialized.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Key cannot be mapped to a storage location.
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
}

/// String key-value storage.
pub trait CartStorage: Send + Sync + 'static {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, StorageError>> + Send;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: String)
    -> impl Future<Output = Result<(), StorageError>> + Send;
}

/// Storage key of the cart for a namespace, e.g. `@RocketShoes:cart`.
#[must_use]
pub fn cart_key(namespace: &str) -> String {
    format!("@{namespace}:cart")
}
