//! HTTP route handlers for the cart API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                  - Health check
//!
//! # Cart (JSON)
//! GET    /cart                    - Current cart
//! POST   /cart/items              - Add one unit of a product
//! PATCH  /cart/items/{product_id} - Set a product's amount
//! DELETE /cart/items/{product_id} - Remove a product
//! ```
//!
//! Every cart route answers with the cart after the call plus the
//! notifications that call raised.

pub mod cart;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::catalog::Catalog;
use crate::error::AppError;
use crate::state::AppState;
use crate::storage::CartStorage;

/// Create the application router.
pub fn routes<C: Catalog, S: CartStorage>() -> Router<AppState<C, S>> {
    Router::new()
        .route("/health", get(health))
        .route("/cart", get(cart::show::<C, S>))
        .route("/cart/items", post(cart::add::<C, S>))
        .route(
            "/cart/items/{product_id}",
            patch(cart::update::<C, S>).delete(cart::remove::<C, S>),
        )
        .fallback(not_found)
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}

async fn not_found(uri: axum::http::Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}
