//! Cart route handlers.
//!
//! Thin JSON wrappers around [`CartStore`](crate::store::CartStore). A
//! rejected operation still answers `200 OK`: the unchanged cart comes back
//! together with the notification to show.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use cartstore_core::{Cart, LineItem, ProductId};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::catalog::Catalog;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::state::AppState;
use crate::storage::CartStorage;
use crate::store::{Notification, UpdateProductAmount};

/// Cart as returned to front ends.
#[derive(Debug, Clone, Serialize)]
pub struct CartResponse {
    /// Line items in insertion order.
    pub items: Vec<LineItem>,
    /// Total units across all lines.
    pub item_count: u64,
    /// Notifications raised by this request.
    pub notifications: Vec<Notification>,
}

impl CartResponse {
    fn new(cart: &Cart, notification: Option<Notification>) -> Self {
        Self {
            items: cart.items().to_vec(),
            item_count: cart.item_count(),
            notifications: notification.into_iter().collect(),
        }
    }
}

/// Add to cart request body.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    #[serde(alias = "productId")]
    pub product_id: ProductId,
}

/// Update amount request body.
#[derive(Debug, Deserialize)]
pub struct UpdateAmountRequest {
    pub amount: i64,
}

/// Map a JSON extraction failure to a 400 with the reason.
fn json_body<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

/// Display the cart.
#[instrument(skip(state))]
pub async fn show<C: Catalog, S: CartStorage>(
    State(state): State<AppState<C, S>>,
) -> Json<CartResponse> {
    Json(CartResponse::new(&state.store().snapshot(), None))
}

/// Add one unit of a product.
#[instrument(skip(state, payload))]
pub async fn add<C: Catalog, S: CartStorage>(
    State(state): State<AppState<C, S>>,
    payload: std::result::Result<Json<AddToCartRequest>, JsonRejection>,
) -> Result<Json<CartResponse>> {
    let AddToCartRequest { product_id } = json_body(payload)?;
    let id = product_id.to_string();
    add_breadcrumb("cart", "Add product", Some(&[("product_id", id.as_str())]));

    let notification = state.store().add_product(product_id).await;
    Ok(Json(CartResponse::new(&state.store().snapshot(), notification)))
}

/// Set a product's amount.
#[instrument(skip(state, payload), fields(product_id = %product_id))]
pub async fn update<C: Catalog, S: CartStorage>(
    State(state): State<AppState<C, S>>,
    Path(product_id): Path<ProductId>,
    payload: std::result::Result<Json<UpdateAmountRequest>, JsonRejection>,
) -> Result<Json<CartResponse>> {
    let UpdateAmountRequest { amount } = json_body(payload)?;
    let (id, requested) = (product_id.to_string(), amount.to_string());
    add_breadcrumb(
        "cart",
        "Update amount",
        Some(&[("product_id", id.as_str()), ("amount", requested.as_str())]),
    );

    let notification = state
        .store()
        .update_product_amount(UpdateProductAmount { product_id, amount })
        .await;
    Ok(Json(CartResponse::new(&state.store().snapshot(), notification)))
}

/// Remove a product.
#[instrument(skip(state), fields(product_id = %product_id))]
pub async fn remove<C: Catalog, S: CartStorage>(
    State(state): State<AppState<C, S>>,
    Path(product_id): Path<ProductId>,
) -> Json<CartResponse> {
    let id = product_id.to_string();
    add_breadcrumb("cart", "Remove product", Some(&[("product_id", id.as_str())]));

    let notification = state.store().remove_product(product_id).await;
    Json(CartResponse::new(&state.store().snapshot(), notification))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use cartstore_core::Product;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::catalog::MemoryCatalog;
    use crate::routes::routes;
    use crate::state::AppState;
    use crate::storage::MemoryStorage;
    use crate::store::CartStore;

    async fn app() -> axum::Router {
        let catalog = MemoryCatalog::new()
            .with_product(Product::new(1.into(), "Tênis de Caminhada"), 2)
            .with_product(Product::new(2.into(), "Tênis VR Caminhada"), 5);
        let store = CartStore::load(catalog, MemoryStorage::new(), "test").await;
        routes().with_state(AppState::new(store))
    }

    async fn send(
        app: &axum::Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn test_empty_cart() {
        let app = app().await;
        let (status, body) = send(&app, Method::GET, "/cart", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "items": [], "item_count": 0, "notifications": [] }));
    }

    #[tokio::test]
    async fn test_add_update_remove() {
        let app = app().await;

        let (status, body) = send(&app, Method::POST, "/cart/items", Some(json!({ "product_id": 2 }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["items"][0]["id"], json!(2));
        assert_eq!(body["items"][0]["amount"], json!(1));

        let (_, body) = send(&app, Method::PATCH, "/cart/items/2", Some(json!({ "amount": 4 }))).await;
        assert_eq!(body["item_count"], json!(4));
        assert_eq!(body["notifications"], json!([]));

        let (_, body) = send(&app, Method::DELETE, "/cart/items/2", None).await;
        assert_eq!(body["items"], json!([]));
    }

    #[tokio::test]
    async fn test_rejections_come_back_as_notifications() {
        let app = app().await;

        send(&app, Method::POST, "/cart/items", Some(json!({ "productId": 1 }))).await;
        send(&app, Method::POST, "/cart/items", Some(json!({ "productId": 1 }))).await;
        let (status, body) = send(&app, Method::POST, "/cart/items", Some(json!({ "productId": 1 }))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["items"][0]["amount"], json!(2));
        assert_eq!(body["notifications"][0]["kind"], json!("stock_exceeded"));

        let (_, body) = send(&app, Method::DELETE, "/cart/items/9", None).await;
        assert_eq!(body["notifications"][0]["kind"], json!("remove_failed"));
        assert_eq!(body["item_count"], json!(2));
    }

    #[tokio::test]
    async fn test_non_positive_amount_is_ignored() {
        let app = app().await;
        send(&app, Method::POST, "/cart/items", Some(json!({ "product_id": 2 }))).await;

        let (_, body) = send(&app, Method::PATCH, "/cart/items/2", Some(json!({ "amount": 0 }))).await;
        assert_eq!(body["item_count"], json!(1));
        assert_eq!(body["notifications"], json!([]));
    }

    #[tokio::test]
    async fn test_bad_requests() {
        let app = app().await;

        let (status, _) = send(&app, Method::POST, "/cart/items", Some(json!({ "id": "x" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, Method::DELETE, "/cart/items/not-a-number", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, Method::GET, "/nope", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
