//! Tests for the gallery screen state machine.

mod test_utils;

use picsync_config::{SettingsStore, UploadSettings};
use picsync_core::{BatchSummary, StatusKind};
use picsync_error::{PicsyncErrorKind, StateErrorKind};
use picsync_host::{InMemoryPhotoLibrary, MediaSourceAdapter, MemoryStore};
use picsync_sync::{GalleryScreen, ScreenEvent, SelectionMode, TapEffect};
use std::sync::Arc;
use std::time::Duration;
use test_utils::{photos, record, MockTransport};

struct Fixture {
    library: Arc<InMemoryPhotoLibrary>,
    transport: Arc<MockTransport>,
    settings: SettingsStore,
    screen: GalleryScreen,
}

fn fixture(ids: &[&str], transport: MockTransport, page_size: usize) -> Fixture {
    let library = Arc::new(InMemoryPhotoLibrary::with_photos(photos(ids)));
    let transport = Arc::new(transport);
    let settings = SettingsStore::new(Arc::new(MemoryStore::new()), "http://127.0.0.1:8000/api");
    let screen = GalleryScreen::new(
        MediaSourceAdapter::new(library.clone()),
        transport.clone(),
        settings.clone(),
        page_size,
    );
    Fixture {
        library,
        transport,
        settings,
        screen,
    }
}

fn loaded_ids(screen: &GalleryScreen) -> Vec<String> {
    screen.items().iter().map(|item| item.id().to_string()).collect()
}

fn state_error(err: &picsync_error::PicsyncError) -> Option<StateErrorKind> {
    match err.kind() {
        PicsyncErrorKind::State(e) => Some(e.kind().clone()),
        _ => None,
    }
}

#[tokio::test]
async fn test_overlapping_pages_are_deduplicated() {
    let mut f = fixture(&["id1", "id2", "id3", "id4"], MockTransport::new(), 2);
    f.screen.load_initial().await;
    assert_eq!(loaded_ids(&f.screen), vec!["id1", "id2"]);

    // A new photo appears at the front, shifting everything by one.
    f.library.set_photos(photos(&["id0", "id1", "id2", "id3", "id4"]));
    let added = f.screen.load_more().await;

    assert_eq!(added, 1);
    assert_eq!(loaded_ids(&f.screen), vec!["id1", "id2", "id3"]);
}

#[tokio::test]
async fn test_paging_stops_when_everything_is_loaded() {
    let mut f = fixture(&["a", "b", "c"], MockTransport::new(), 2);
    f.screen.load_initial().await;
    assert!(*f.screen.pagination().has_more());

    f.screen.load_more().await;
    assert_eq!(loaded_ids(&f.screen), vec!["a", "b", "c"]);
    assert!(!*f.screen.pagination().has_more());

    assert_eq!(f.screen.load_more().await, 0);
    assert_eq!(*f.screen.pagination().current_offset(), 3);
}

#[tokio::test]
async fn test_refresh_resets_paging() {
    let mut f = fixture(&["a", "b", "c"], MockTransport::new(), 2);
    f.screen.load_initial().await;
    f.screen.load_more().await;

    f.screen.refresh().await;

    assert_eq!(loaded_ids(&f.screen), vec!["a", "b"]);
    assert_eq!(*f.screen.pagination().current_offset(), 2);
}

#[tokio::test]
async fn test_initial_load_reconciles_with_server() {
    let transport = MockTransport::with_records(vec![record("r1", "b.jpg")]);
    let mut f = fixture(&["a", "b"], transport, 10);

    f.screen.load_initial().await;

    let items = f.screen.items();
    assert!(!items[0].is_uploaded);
    assert!(items[1].is_uploaded);
    assert_eq!(items[1].uploaded_record_id.as_deref(), Some("r1"));
}

#[tokio::test]
async fn test_server_failure_degrades_to_not_uploaded() {
    let transport = MockTransport::with_records(vec![record("r1", "a.jpg")]);
    transport.set_list_fails(true);
    let mut f = fixture(&["a"], transport, 10);

    f.screen.load_initial().await;

    assert_eq!(f.screen.items().len(), 1);
    assert!(!f.screen.items()[0].is_uploaded);
}

#[tokio::test]
async fn test_uploads_show_as_uploaded_while_server_list_is_down() {
    let transport = MockTransport::new();
    transport.set_list_fails(true);
    let mut f = fixture(&["a", "b"], transport, 10);
    f.screen.load_initial().await;
    f.screen.long_press("a");

    f.screen.upload_selected().await.unwrap();

    let uploaded: Vec<bool> = f.screen.items().iter().map(|item| item.is_uploaded).collect();
    assert_eq!(uploaded, vec![true, false]);
}

#[tokio::test]
async fn test_host_failure_shows_error_and_empty_page() {
    let mut f = fixture(&["a"], MockTransport::new(), 10);
    f.library.set_failing(true);

    f.screen.load_initial().await;

    assert!(f.screen.items().is_empty());
    let status = f.screen.status().expect("status");
    assert_eq!(status.kind, StatusKind::Error);
    assert!(status.text.starts_with("Error: Failed to load photos"));
}

#[tokio::test]
async fn test_tap_and_long_press_transitions() {
    let transport = MockTransport::with_records(vec![record("r1", "b.jpg")]);
    let mut f = fixture(&["a", "b", "c"], transport, 10);
    f.screen.load_initial().await;

    assert_eq!(f.screen.tap("a"), TapEffect::OpenDetail("a".to_string()));
    assert!(!f.screen.selection().is_active());

    assert_eq!(
        f.screen.long_press("a"),
        TapEffect::SelectionStarted(SelectionMode::Upload)
    );
    assert_eq!(f.screen.tap("c"), TapEffect::Toggled);
    assert_eq!(f.screen.tap("b"), TapEffect::Ignored);
    assert_eq!(f.screen.selection().ids(), ["a".to_string(), "c".to_string()]);

    f.screen.tap("a");
    f.screen.tap("c");
    assert!(!f.screen.selection().is_active());
    assert_eq!(f.screen.tap("b"), TapEffect::OpenDetail("b".to_string()));
    assert_eq!(f.screen.tap("missing"), TapEffect::Ignored);
}

#[tokio::test]
async fn test_selection_mode_is_fixed_by_first_item() {
    let transport = MockTransport::with_records(vec![record("r1", "a.jpg")]);
    let mut f = fixture(&["a", "b"], transport, 10);
    f.screen.load_initial().await;

    f.screen.long_press("a");
    f.screen.tap("b");

    assert_eq!(f.screen.selection().mode(), Some(SelectionMode::Delete));
    assert_eq!(f.screen.selection().ids(), ["a".to_string()]);
}

#[tokio::test]
async fn test_cancel_clears_selection_and_status() {
    let mut f = fixture(&["a"], MockTransport::new(), 10);
    f.screen.load_initial().await;
    f.screen.long_press("a");
    f.screen.upload_selected().await.unwrap();
    f.screen.long_press("a");

    f.screen.cancel_selection();

    assert!(!f.screen.selection().is_active());
    assert!(f.screen.status().is_none());
}

#[tokio::test]
async fn test_upload_selected_updates_items_and_reports() {
    let mut f = fixture(&["a", "b", "c"], MockTransport::new(), 10);
    f.screen.load_initial().await;
    f.screen.long_press("a");
    f.screen.tap("c");

    let summary = f.screen.upload_selected().await.unwrap();

    assert_eq!(
        summary,
        BatchSummary {
            success_count: 2,
            fail_count: 0
        }
    );
    let uploaded: Vec<bool> = f.screen.items().iter().map(|item| item.is_uploaded).collect();
    assert_eq!(uploaded, vec![true, false, true]);
    assert!(!f.screen.selection().is_active());
    assert!(!f.screen.is_uploading());
    let status = f.screen.status().unwrap();
    assert_eq!(status.kind, StatusKind::Success);
    assert_eq!(status.text, "2 uploaded");
}

#[tokio::test]
async fn test_upload_uses_configured_concurrency() {
    let transport = MockTransport::new().with_delay(Duration::from_millis(5));
    let mut f = fixture(&["a", "b", "c", "d", "e"], transport, 10);
    f.settings
        .save_upload_settings(UploadSettings::default().with_max_parallel_uploads(2))
        .unwrap();
    f.screen.load_initial().await;
    f.screen.long_press("a");
    for id in ["b", "c", "d", "e"] {
        f.screen.tap(id);
    }

    f.screen.upload_selected().await.unwrap();

    assert!(f.transport.max_in_flight() <= 2);
    assert_eq!(f.transport.record_count(), 5);
}

#[tokio::test]
async fn test_upload_partial_failure_then_manual_retry() {
    let transport = MockTransport::new();
    transport.fail_upload_of("b.jpg");
    let mut f = fixture(&["a", "b"], transport, 10);
    f.screen.load_initial().await;
    f.screen.long_press("a");
    f.screen.tap("b");

    let summary = f.screen.upload_selected().await.unwrap();
    assert_eq!(summary.fail_count, 1);
    let status = f.screen.status().unwrap();
    assert_eq!(status.kind, StatusKind::Error);
    assert_eq!(status.text, "1 uploaded, 1 failed");
    assert_eq!(f.screen.progress().failed_ids(), vec!["b".to_string()]);

    f.transport.heal_upload_of("b.jpg");
    let retried = f.screen.retry_failed().await.unwrap();

    assert_eq!(
        retried,
        BatchSummary {
            success_count: 1,
            fail_count: 0
        }
    );
    assert!(f.screen.items().iter().all(|item| item.is_uploaded));
    assert!(f.screen.progress().failed_ids().is_empty());
}

#[tokio::test]
async fn test_retry_with_nothing_failed_is_a_no_op() {
    let mut f = fixture(&["a"], MockTransport::new(), 10);
    f.screen.load_initial().await;

    let summary = f.screen.retry_failed().await.unwrap();

    assert_eq!(summary, BatchSummary::default());
    assert_eq!(f.screen.status().unwrap().kind, StatusKind::Info);
}

#[tokio::test]
async fn test_actions_require_matching_mode() {
    let transport = MockTransport::with_records(vec![record("r1", "a.jpg")]);
    let mut f = fixture(&["a", "b"], transport, 10);
    f.screen.load_initial().await;

    let err = f.screen.upload_selected().await.unwrap_err();
    assert_eq!(state_error(&err), Some(StateErrorKind::EmptySelection));

    f.screen.long_press("a");
    let err = f.screen.upload_selected().await.unwrap_err();
    assert_eq!(
        state_error(&err),
        Some(StateErrorKind::InvalidMode("upload".to_string()))
    );

    f.screen.cancel_selection();
    f.screen.long_press("b");
    let err = f.screen.delete_selected().await.unwrap_err();
    assert_eq!(
        state_error(&err),
        Some(StateErrorKind::InvalidMode("delete".to_string()))
    );
}

#[tokio::test]
async fn test_delete_selected_runs_sequentially() {
    let transport = MockTransport::with_records(vec![
        record("r1", "a.jpg"),
        record("r2", "b.jpg"),
        record("r3", "c.jpg"),
    ]);
    let mut f = fixture(&["a", "b", "c"], transport, 10);
    f.screen.load_initial().await;
    f.screen.long_press("c");
    f.screen.tap("a");

    let summary = f.screen.delete_selected().await.unwrap();

    assert_eq!(
        summary,
        BatchSummary {
            success_count: 2,
            fail_count: 0
        }
    );
    assert_eq!(f.transport.deletes(), vec!["r3".to_string(), "r1".to_string()]);
    assert_eq!(f.transport.max_in_flight(), 1);
    let uploaded: Vec<bool> = f.screen.items().iter().map(|item| item.is_uploaded).collect();
    assert_eq!(uploaded, vec![false, true, false]);
    assert_eq!(f.screen.status().unwrap().text, "2 deleted");
    assert!(!f.screen.selection().is_active());
}

#[tokio::test]
async fn test_delete_partial_failure_message() {
    let transport = MockTransport::with_records(vec![record("r1", "a.jpg"), record("r2", "b.jpg")]);
    transport.fail_delete_of("r2");
    let mut f = fixture(&["a", "b"], transport, 10);
    f.screen.load_initial().await;
    f.screen.long_press("a");
    f.screen.tap("b");

    let summary = f.screen.delete_selected().await.unwrap();

    assert_eq!(summary.fail_count, 1);
    assert_eq!(f.screen.status().unwrap().text, "1 deleted, 1 failed");
    assert!(f.screen.items()[1].is_uploaded);
}

#[tokio::test]
async fn test_session_expiry_is_reported() {
    let mut f = fixture(&["a"], MockTransport::new(), 10);
    f.screen.load_initial().await;
    f.screen.long_press("a");
    f.transport.set_unauthorized(true);

    let summary = f.screen.upload_selected().await.unwrap();

    assert_eq!(summary.fail_count, 1);
    assert_eq!(f.screen.status().unwrap().text, "Error: Session expired");
}

#[tokio::test]
async fn test_auto_upload_runs_in_background() {
    let transport = MockTransport::new().with_delay(Duration::from_millis(5));
    let mut f = fixture(&["a", "b", "c"], transport, 10);
    f.settings
        .save_upload_settings(
            UploadSettings::default()
                .with_auto_upload(true)
                .with_auto_upload_concurrency(1),
        )
        .unwrap();
    f.screen.load_initial().await;

    assert!(f.screen.trigger_auto_upload());
    assert!(f.screen.is_uploading());
    assert!(!f.screen.trigger_auto_upload());

    let summary = f.screen.wait_for_auto_upload().await.unwrap();

    assert_eq!(summary.success_count, 3);
    assert_eq!(f.transport.max_in_flight(), 1);
    assert!(f.screen.items().iter().all(|item| item.is_uploaded));
    assert!(!f.screen.is_uploading());
    assert_eq!(f.screen.status().unwrap().text, "3 uploaded");
    assert!(!f.screen.selection().is_active());
}

#[tokio::test]
async fn test_auto_upload_reports_each_item() {
    let mut f = fixture(&["a", "b"], MockTransport::new(), 10);
    f.settings
        .save_upload_settings(UploadSettings::default().with_auto_upload(true))
        .unwrap();
    f.screen.load_initial().await;
    assert!(f.screen.trigger_auto_upload());

    let mut items_done = 0;
    loop {
        match f.screen.next_event().await.unwrap() {
            ScreenEvent::ItemDone { .. } => items_done += 1,
            event @ ScreenEvent::AutoUploadFinished(_) => {
                f.screen.handle_event(event);
                break;
            }
        }
    }
    assert_eq!(items_done, 2);
}

#[tokio::test]
async fn test_auto_upload_guards() {
    let mut f = fixture(&["a", "b"], MockTransport::new(), 10);
    f.screen.load_initial().await;
    assert!(!f.screen.trigger_auto_upload(), "disabled by default");

    f.settings
        .save_upload_settings(UploadSettings::default().with_auto_upload(true))
        .unwrap();
    f.screen.long_press("a");
    assert!(!f.screen.trigger_auto_upload(), "selection is active");

    f.screen.cancel_selection();
    assert!(f.screen.trigger_auto_upload());
    f.screen.wait_for_auto_upload().await;
    assert!(!f.screen.trigger_auto_upload(), "nothing left to upload");
}

#[tokio::test]
async fn test_manual_upload_refused_while_auto_upload_runs() {
    let transport = MockTransport::new().with_delay(Duration::from_millis(50));
    let mut f = fixture(&["a", "b"], transport, 10);
    f.settings
        .save_upload_settings(UploadSettings::default().with_auto_upload(true))
        .unwrap();
    f.screen.load_initial().await;
    assert!(f.screen.trigger_auto_upload());

    f.screen.long_press("a");
    let err = f.screen.upload_selected().await.unwrap_err();

    assert_eq!(state_error(&err), Some(StateErrorKind::Busy));
    assert_eq!(f.screen.status().unwrap().kind, StatusKind::Info);
    assert!(f.screen.selection().is_active());
    f.screen.wait_for_auto_upload().await;
}

#[tokio::test]
async fn test_wait_without_auto_upload_returns_at_once() {
    let mut f = fixture(&["a"], MockTransport::new(), 10);
    f.screen.load_initial().await;

    let waited = tokio::time::timeout(Duration::from_secs(2), f.screen.wait_for_auto_upload()).await;

    assert_eq!(waited.unwrap(), None);
    assert!(!f.screen.auto_upload_pending());
}

#[tokio::test]
async fn test_second_wait_after_auto_upload_returns_at_once() {
    let mut f = fixture(&["a", "b"], MockTransport::new(), 10);
    f.settings
        .save_upload_settings(UploadSettings::default().with_auto_upload(true))
        .unwrap();
    f.screen.load_initial().await;
    assert!(f.screen.trigger_auto_upload());
    assert!(f.screen.auto_upload_pending());

    assert!(f.screen.wait_for_auto_upload().await.is_some());
    assert!(!f.screen.auto_upload_pending());

    let again = tokio::time::timeout(Duration::from_secs(2), f.screen.wait_for_auto_upload()).await;
    assert_eq!(again.unwrap(), None);
}
