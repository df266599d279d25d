//! The cart store wired to the HTTP catalog and file storage.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use cartstore_core::ProductId;
use cartstore_integration_tests::{catalog_for, product_body, stock_body};
use cartstore_storefront::storage::{CartStorage, FileStorage, cart_key};
use cartstore_storefront::store::{CartStore, NotificationKind, UpdateProductAmount};
use mockito::Server;
use serde_json::Value;

#[tokio::test]
async fn test_add_until_stock_runs_out() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/stock/42")
        .with_status(200)
        .with_body(stock_body(42, 3))
        .expect(4)
        .create_async()
        .await;
    let product = server
        .mock("GET", "/products/42")
        .with_status(200)
        .with_body(product_body(42, "Tênis de Caminhada", 179.9))
        .expect(1)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let store = CartStore::load(
        catalog_for(&server.url()),
        FileStorage::new(dir.path()),
        "RocketShoes",
    )
    .await;

    for _ in 0..3 {
        assert!(store.add_product(ProductId::new(42)).await.is_none());
    }
    let rejected = store.add_product(ProductId::new(42)).await.unwrap();

    assert_eq!(rejected.kind, NotificationKind::StockExceeded);
    assert_eq!(store.snapshot().amount_of(ProductId::new(42)), 3);
    product.assert_async().await;

    let stored = store
        .storage()
        .get(&cart_key("RocketShoes"))
        .await
        .unwrap()
        .unwrap();
    let stored: Value = serde_json::from_str(&stored).unwrap();
    assert_eq!(stored[0]["id"], 42);
    assert_eq!(stored[0]["amount"], 3);
    assert_eq!(stored[0]["price"], serde_json::json!(179.9));
}

#[tokio::test]
async fn test_cart_survives_restart() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/stock/1")
        .with_status(200)
        .with_body(stock_body(1, 5))
        .create_async()
        .await;
    let _mock = server
        .mock("GET", "/products/1")
        .with_status(200)
        .with_body(product_body(1, "Runner", 99.9))
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let first = CartStore::load(
        catalog_for(&server.url()),
        FileStorage::new(dir.path()),
        "RocketShoes",
    )
    .await;
    first.add_product(ProductId::new(1)).await;
    first
        .update_product_amount(UpdateProductAmount {
            product_id: ProductId::new(1),
            amount: 4,
        })
        .await;

    let second = CartStore::load(
        catalog_for(&server.url()),
        FileStorage::new(dir.path()),
        "RocketShoes",
    )
    .await;

    assert_eq!(*second.snapshot(), *first.snapshot());
    assert_eq!(second.snapshot().amount_of(ProductId::new(1)), 4);
}

#[tokio::test]
async fn test_catalog_outage_keeps_cart() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/stock/1")
        .with_status(503)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::new(dir.path());
    storage
        .set(
            &cart_key("RocketShoes"),
            r#"[{"id":1,"title":"Runner","amount":2}]"#.to_string(),
        )
        .await
        .unwrap();

    let store = CartStore::load(catalog_for(&server.url()), storage, "RocketShoes").await;
    let failed = store.add_product(ProductId::new(1)).await.unwrap();

    assert_eq!(failed.kind, NotificationKind::AddFailed);
    assert_eq!(failed.message, "Failed to add product");
    assert_eq!(store.snapshot().amount_of(ProductId::new(1)), 2);
}

#[tokio::test]
async fn test_corrupt_file_starts_empty() {
    let server = Server::new_async().await;
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::new(dir.path());
    storage
        .set(&cart_key("RocketShoes"), "{not json".to_string())
        .await
        .unwrap();

    let store = CartStore::load(catalog_for(&server.url()), storage, "RocketShoes").await;

    assert!(store.snapshot().is_empty());
    assert_eq!(
        store
            .storage()
            .get(&cart_key("RocketShoes"))
            .await
            .unwrap()
            .as_deref(),
        Some("{not json")
    );
}
