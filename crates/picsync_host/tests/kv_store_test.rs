//! Tests for key-value stores.

use picsync_host::{JsonFileStore, KeyValueStore, MemoryStore};
use tempfile::TempDir;

#[test]
fn test_memory_store_round_trip() {
    let store = MemoryStore::new();
    assert!(store.get("serverUrl").is_none());
    store.set("serverUrl", "http://10.0.0.2:8000/api").unwrap();
    assert_eq!(store.get("serverUrl").as_deref(), Some("http://10.0.0.2:8000/api"));
}

#[test]
fn test_json_file_store_persists_across_opens() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nested").join("store.json");

    let store = JsonFileStore::open(&path).unwrap();
    store.set("auth_token", "abc").unwrap();
    store.set("uploadSettings", r#"{"maxParallelUploads":4}"#).unwrap();
    drop(store);

    let reopened = JsonFileStore::open(&path).unwrap();
    assert_eq!(reopened.get("auth_token").as_deref(), Some("abc"));
    assert_eq!(
        reopened.get("uploadSettings").as_deref(),
        Some(r#"{"maxParallelUploads":4}"#)
    );
    assert!(!path.with_extension("tmp").exists());
}

#[test]
fn test_json_file_store_rejects_garbage() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("store.json");
    std::fs::write(&path, "not json").unwrap();
    assert!(JsonFileStore::open(&path).is_err());
}
