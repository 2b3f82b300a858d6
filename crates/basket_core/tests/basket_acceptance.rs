use basket_core::{BasketManager, BASKET_KEY};
use shared::domain::BasketEntry;
use storage::Storage;

#[tokio::test]
async fn basket_survives_storage_reopen_and_clear_is_durable() {
    let suffix = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let temp_root = std::env::temp_dir().join(format!("proto_shop_acceptance_{suffix}"));
    let db_path = temp_root.join("basket.db");
    let database_url = format!("sqlite://{}", db_path.to_string_lossy().replace('\\', "/"));

    {
        let storage = Storage::new(&database_url).await.expect("db");
        let manager = BasketManager::new(storage);
        manager.add("apple").await.expect("add apple");
        manager.add("apple").await.expect("add apple again");
        manager.add("banana").await.expect("add banana");
    }

    {
        let storage = Storage::new(&database_url).await.expect("reopen db");
        let manager = BasketManager::new(storage);
        assert_eq!(
            manager.load().await.expect("load"),
            vec![BasketEntry::new("apple", 2), BasketEntry::new("banana", 1)]
        );
        assert!(manager.last_saved().await.expect("last saved").is_some());

        manager.clear().await.expect("clear");
    }

    {
        let storage = Storage::new(&database_url).await.expect("reopen db");
        let manager = BasketManager::new(storage.clone());
        assert!(manager.load().await.expect("load").is_empty());
        assert!(!storage.contains_key(BASKET_KEY).await.expect("contains"));
    }

    std::fs::remove_dir_all(temp_root).expect("cleanup");
}
