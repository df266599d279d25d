//! Cart commands.
//!
//! Each command opens the persisted cart, runs one store operation, and
//! prints the resulting cart to stdout. Rejections are logged as warnings on
//! stderr; the command itself still succeeds, mirroring how the storefront
//! treats them.

use cartstore_core::{Cart, ProductId};
use cartstore_storefront::catalog::{CatalogError, HttpCatalog};
use cartstore_storefront::config::{CartConfig, ConfigError};
use cartstore_storefront::storage::FileStorage;
use cartstore_storefront::store::{CartStore, Notification, UpdateProductAmount};
use thiserror::Error;

/// Store type the CLI operates on.
pub type Store = CartStore<HttpCatalog, FileStorage>;

/// Errors that prevent a command from running.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Catalog client could not be built.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Cart could not be rendered.
    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),
}

/// Open the store described by the environment.
///
/// # Errors
///
/// Returns an error if the configuration is invalid.
pub async fn open_store() -> Result<Store, CommandError> {
    let config = CartConfig::from_env()?;
    let catalog = HttpCatalog::new(&config.catalog)?;
    let storage = FileStorage::new(&config.storage.dir);

    tracing::debug!(dir = %storage.dir().display(), "Opening cart");
    Ok(CartStore::load(catalog, storage, &config.storage.namespace).await)
}

/// Add one unit of a product.
pub async fn add(store: &Store, product_id: ProductId) -> Option<Notification> {
    store.add_product(product_id).await
}

/// Remove a product.
pub async fn remove(store: &Store, product_id: ProductId) -> Option<Notification> {
    store.remove_product(product_id).await
}

/// Set a product's amount.
pub async fn set(store: &Store, product_id: ProductId, amount: i64) -> Option<Notification> {
    store
        .update_product_amount(UpdateProductAmount { product_id, amount })
        .await
}

/// Log the notification raised by the command, if any, and print the cart
/// to stdout.
///
/// # Errors
///
/// Returns an error if the cart cannot be serialized.
pub fn report(
    store: &Store,
    notification: Option<&Notification>,
    json: bool,
) -> Result<(), CommandError> {
    if let Some(notification) = notification {
        tracing::warn!(product_id = %notification.product_id, "{}", notification.message);
    }

    let output = render(&store.snapshot(), json)?;

    #[allow(clippy::print_stdout)]
    {
        println!("{output}");
    }
    Ok(())
}

/// The cart as pretty JSON or as a summary.
fn render(cart: &Cart, json: bool) -> Result<String, serde_json::Error> {
    if json {
        serde_json::to_string_pretty(cart)
    } else {
        Ok(summary(cart).join("\n"))
    }
}

/// One line per cart item plus a total.
fn summary(cart: &Cart) -> Vec<String> {
    if cart.is_empty() {
        return vec!["Cart is empty".to_string()];
    }

    let mut lines: Vec<String> = cart
        .iter()
        .map(|item| {
            let price = item
                .product
                .price
                .map_or_else(String::new, |price| format!(" @ {price}"));
            format!(
                "{:>6}  {} x{}{price}",
                item.id().as_i32(),
                item.product.name,
                item.amount
            )
        })
        .collect();
    lines.push(format!(
        "{} products, {} units",
        cart.len(),
        cart.item_count()
    ));
    lines
}
