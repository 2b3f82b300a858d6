use super::*;

#[tokio::test]
async fn stores_and_reads_back_value() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage
        .write_value("basket", r#"[{"product":"apple","quantity":1}]"#)
        .await
        .expect("write");

    let stored = storage
        .read_value("basket")
        .await
        .expect("read")
        .expect("some value");
    assert_eq!(stored.value, r#"[{"product":"apple","quantity":1}]"#);
}

#[tokio::test]
async fn overwrite_replaces_previous_value_wholesale() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let first_stamp = storage.write_value("basket", "old").await.expect("write");
    let second_stamp = storage.write_value("basket", "new").await.expect("write");
    assert!(second_stamp >= first_stamp);

    let stored = storage
        .read_value("basket")
        .await
        .expect("read")
        .expect("some value");
    assert_eq!(stored.value, "new");
    assert!(stored.updated_at >= first_stamp);
}

#[tokio::test]
async fn missing_key_reads_back_none() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    assert!(storage.read_value("basket").await.expect("read").is_none());
    assert!(!storage.contains_key("basket").await.expect("contains"));
}

#[tokio::test]
async fn remove_leaves_key_absent() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage.write_value("basket", "[]").await.expect("write");
    assert!(storage.contains_key("basket").await.expect("contains"));

    storage.remove_value("basket").await.expect("remove");
    assert!(!storage.contains_key("basket").await.expect("contains"));
    assert!(storage.read_value("basket").await.expect("read").is_none());
}

#[tokio::test]
async fn remove_of_missing_key_is_a_no_op() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage.remove_value("basket").await.expect("remove");
}

#[tokio::test]
async fn health_check_succeeds_for_live_pool() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage.health_check().await.expect("health check");
}

#[tokio::test]
async fn creates_database_file_when_missing() {
    let suffix = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let temp_root = std::env::temp_dir().join(format!("proto_shop_storage_test_{suffix}"));
    let db_path = temp_root.join("nested").join("basket.db");
    let database_url = format!("sqlite://{}", db_path.to_string_lossy().replace('\\', "/"));

    let storage = Storage::new(&database_url).await.expect("db");
    drop(storage);

    assert!(
        db_path.exists(),
        "database file should exist: {}",
        db_path.display()
    );

    std::fs::remove_dir_all(temp_root).expect("cleanup");
}
