//! Tests for wiring the application context.

use picsync::{
    AppContext, InMemoryPhotoLibrary, KeyValueStore, MemoryStore, PhotoDescriptor, PicsyncConfig,
    SERVER_URL_KEY, UPLOAD_SETTINGS_KEY,
};
use std::sync::Arc;

fn library() -> Arc<InMemoryPhotoLibrary> {
    Arc::new(InMemoryPhotoLibrary::with_photos(vec![
        PhotoDescriptor::new("1", "/p/a.jpg", "a.jpg", 3),
        PhotoDescriptor::new("2", "/p/b.jpg", "b.jpg", 3),
        PhotoDescriptor::new("3", "/p/c.jpg", "c.jpg", 3),
    ]))
}

async fn closed_port_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/api", addr)
}

#[test]
fn test_config_supplies_defaults() {
    let config = PicsyncConfig::from_toml_str(
        r#"
        [server]
        base_url = "http://10.1.1.1:8000/api"

        [upload]
        max_parallel_uploads = 5
        "#,
    )
    .unwrap();

    let context = AppContext::new(config, Arc::new(MemoryStore::new()), library()).unwrap();

    assert_eq!(context.client().base_url(), "http://10.1.1.1:8000/api");
    assert_eq!(
        *context.settings().load_upload_settings().max_parallel_uploads(),
        5
    );
    assert!(!context.auth().is_authenticated());
}

#[test]
fn test_stored_settings_override_config() {
    let store = Arc::new(MemoryStore::new());
    store.set(SERVER_URL_KEY, "https://photos.example.com/api").unwrap();
    store
        .set(UPLOAD_SETTINGS_KEY, r#"{"maxParallelUploads":8}"#)
        .unwrap();

    let context = AppContext::new(PicsyncConfig::default(), store, library()).unwrap();

    assert_eq!(context.client().base_url(), "https://photos.example.com/api");
    assert_eq!(
        *context.settings().load_upload_settings().max_parallel_uploads(),
        8
    );
}

#[test]
fn test_with_server_url_shares_session() {
    let context = AppContext::new(PicsyncConfig::default(), Arc::new(MemoryStore::new()), library()).unwrap();
    let other = context.with_server_url("http://10.9.9.9:1234/api").unwrap();

    assert_eq!(other.client().base_url(), "http://10.9.9.9:1234/api");
    assert!(Arc::ptr_eq(context.auth(), other.auth()));
}

#[tokio::test]
async fn test_screen_degrades_when_server_is_down() {
    let store = Arc::new(MemoryStore::new());
    store.set(SERVER_URL_KEY, &closed_port_url().await).unwrap();
    let config = PicsyncConfig::from_toml_str("[gallery]\npage_size = 2").unwrap();
    let context = AppContext::new(config, store, library()).unwrap();

    let mut screen = context.gallery_screen();
    screen.load_initial().await;

    assert_eq!(screen.items().len(), 2);
    assert!(screen.items().iter().all(|item| !item.is_uploaded));
    assert!(!context.client().health_check().await);
}
