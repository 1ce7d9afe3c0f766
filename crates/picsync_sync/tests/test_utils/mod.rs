//! Test utilities for picsync_sync tests.
//!
//! This module provides a scriptable in-process media server and helpers
//! for building photo fixtures.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use picsync_client::MediaTransport;
use picsync_core::{DeleteOutcome, DeletedMedia, PhotoDescriptor, UploadOutcome, UploadedMediaRecord};
use picsync_error::{HttpError, HttpErrorKind, PicsyncResult};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Photo `id` named `<id>.jpg` with a few bytes of content.
pub fn photo(id: &str) -> PhotoDescriptor {
    PhotoDescriptor::new(id, format!("/photos/{}.jpg", id), format!("{}.jpg", id), 4)
}

/// Photos for each id.
pub fn photos(ids: &[&str]) -> Vec<PhotoDescriptor> {
    ids.iter().map(|id| photo(id)).collect()
}

/// Server record for a file originally named `original_file_name`.
pub fn record(id: &str, original_file_name: &str) -> UploadedMediaRecord {
    UploadedMediaRecord {
        id: id.to_string(),
        original_file_name: original_file_name.to_string(),
        stored_file_name: format!("stored-{}", original_file_name),
        size_bytes: 4,
        content_type: "image/jpeg".to_string(),
        uploaded_at: Utc::now(),
    }
}

/// In-process media server with failure injection.
#[derive(Default)]
pub struct MockTransport {
    records: Mutex<Vec<UploadedMediaRecord>>,
    uploads: Mutex<Vec<(String, String)>>,
    deletes: Mutex<Vec<String>>,
    failing_names: Mutex<HashSet<String>>,
    panicking_names: Mutex<HashSet<String>>,
    failing_deletes: Mutex<HashSet<String>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    next_id: AtomicUsize,
    delay: Mutex<Duration>,
    unauthorized: AtomicBool,
    list_fails: AtomicBool,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<UploadedMediaRecord>) -> Self {
        let mock = Self::default();
        *mock.records.lock().unwrap() = records;
        mock
    }

    pub fn with_delay(self, delay: Duration) -> Self {
        *self.delay.lock().unwrap() = delay;
        self
    }

    pub fn fail_upload_of(&self, file_name: &str) {
        self.failing_names.lock().unwrap().insert(file_name.to_string());
    }

    pub fn heal_upload_of(&self, file_name: &str) {
        self.failing_names.lock().unwrap().remove(file_name);
    }

    pub fn panic_on_upload_of(&self, file_name: &str) {
        self.panicking_names.lock().unwrap().insert(file_name.to_string());
    }

    pub fn fail_delete_of(&self, record_id: &str) {
        self.failing_deletes.lock().unwrap().insert(record_id.to_string());
    }

    pub fn set_unauthorized(&self, unauthorized: bool) {
        self.unauthorized.store(unauthorized, Ordering::SeqCst);
    }

    pub fn set_list_fails(&self, fails: bool) {
        self.list_fails.store(fails, Ordering::SeqCst);
    }

    /// `(file name, content type)` of every upload that reached the server.
    pub fn uploads(&self) -> Vec<(String, String)> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn deletes(&self) -> Vec<String> {
        self.deletes.lock().unwrap().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn record_count(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

#[async_trait]
impl MediaTransport for MockTransport {
    async fn upload(&self, bytes: Vec<u8>, file_name: &str, content_type: &str) -> UploadOutcome {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let delay = *self.delay.lock().unwrap();
        if delay.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.panicking_names.lock().unwrap().contains(file_name) {
            panic!("transport blew up on {}", file_name);
        }
        if self.unauthorized.load(Ordering::SeqCst) {
            return UploadOutcome::failure("Token expired", 401);
        }
        if self.failing_names.lock().unwrap().contains(file_name) {
            return UploadOutcome::failure("Internal Server Error", 500);
        }

        self.uploads
            .lock()
            .unwrap()
            .push((file_name.to_string(), content_type.to_string()));
        let id = format!("srv-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        let mut created = record(&id, file_name);
        created.size_bytes = bytes.len() as u64;
        created.content_type = content_type.to_string();
        self.records.lock().unwrap().push(created.clone());
        UploadOutcome::Success { record: created }
    }

    async fn list_media(&self) -> PicsyncResult<Vec<UploadedMediaRecord>> {
        if self.unauthorized.load(Ordering::SeqCst) {
            return Err(HttpError::new(HttpErrorKind::Unauthorized("Token expired".into())).into());
        }
        if self.list_fails.load(Ordering::SeqCst) {
            return Err(HttpError::new(HttpErrorKind::Network("connection refused".into())).into());
        }
        Ok(self.records.lock().unwrap().clone())
    }

    async fn delete_media(&self, id: &str) -> DeleteOutcome {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::task::yield_now().await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        self.deletes.lock().unwrap().push(id.to_string());
        if self.failing_deletes.lock().unwrap().contains(id) {
            return DeleteOutcome::failure("Media not found", 404);
        }
        self.records.lock().unwrap().retain(|record| record.id != id);
        DeleteOutcome::Success {
            deleted: DeletedMedia::new(id, "Deleted", Utc::now()),
        }
    }
}
