//! Cart persistence on disk.

#![allow(clippy::unwrap_used)]

use cartstore_storefront::storage::{CartStorage, FileStorage, cart_key};

#[tokio::test]
async fn test_missing_key_reads_none() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::new(dir.path());

    assert_eq!(storage.get(&cart_key("RocketShoes")).await.unwrap(), None);
}

#[tokio::test]
async fn test_set_then_get() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::new(dir.path());
    let key = cart_key("RocketShoes");

    storage.set(&key, "[]".to_string()).await.unwrap();
    storage
        .set(&key, r#"[{"id":1,"name":"A","amount":2}]"#.to_string())
        .await
        .unwrap();

    assert_eq!(
        storage.get(&key).await.unwrap().as_deref(),
        Some(r#"[{"id":1,"name":"A","amount":2}]"#)
    );
}

#[tokio::test]
async fn test_creates_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::new(dir.path().join("nested").join("carts"));

    storage.set("@Shop:cart", "[]".to_string()).await.unwrap();

    assert!(storage.path_for("@Shop:cart").unwrap().exists());
}

#[tokio::test]
async fn test_keys_are_isolated() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::new(dir.path());

    storage.set(&cart_key("A"), "[1]".to_string()).await.unwrap();
    storage.set(&cart_key("B"), "[2]".to_string()).await.unwrap();

    assert_eq!(storage.get(&cart_key("A")).await.unwrap().as_deref(), Some("[1]"));
    assert_eq!(storage.get(&cart_key("B")).await.unwrap().as_deref(), Some("[2]"));
}

#[tokio::test]
async fn test_no_temp_file_left_behind() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::new(dir.path());

    storage.set(&cart_key("RocketShoes"), "[]".to_string()).await.unwrap();

    let names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names.len(), 1);
    assert!(names.iter().all(|name| name.ends_with(".json")));
}
