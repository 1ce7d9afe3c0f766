//! Bounded-concurrency upload worker pool.

use crate::UploadProgress;
use futures::future::{join_all, FutureExt};
use picsync_client::MediaTransport;
use picsync_core::{
    BatchSummary, ContentType, OutcomeKind, PhotoDescriptor, UploadOutcome, UploadedMediaRecord,
};
use picsync_host::PhotoLibrary;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, instrument, warn};

/// File name used when a descriptor carries none.
const FALLBACK_FILE_NAME: &str = "image.jpg";

/// Everything a finished batch produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadReport {
    /// Success and failure counts
    pub summary: BatchSummary,
    /// Records created by successful uploads, in completion order
    pub records: Vec<UploadedMediaRecord>,
    /// `(photo id, message)` for each failed item, in completion order
    pub failures: Vec<(String, String)>,
    /// Some item failed because the server rejected the session
    pub auth_expired: bool,
}

impl UploadReport {
    fn record(&mut self, id: &str, outcome: UploadOutcome) {
        self.summary.record(outcome.kind());
        if outcome.is_auth_failure() {
            self.auth_expired = true;
        }
        match outcome {
            UploadOutcome::Success { record } => self.records.push(record),
            UploadOutcome::Error { message, .. } => self.failures.push((id.to_string(), message)),
        }
    }
}

/// Pull-based worker pool that uploads photos through a [`MediaTransport`].
///
/// Workers share one atomic cursor and each claims the next unclaimed item
/// until none remain, so no worker idles while another still has a queue.
#[derive(Clone)]
pub struct UploadScheduler {
    library: Arc<dyn PhotoLibrary>,
    transport: Arc<dyn MediaTransport>,
    progress: Option<UploadProgress>,
}

impl std::fmt::Debug for UploadScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadScheduler")
            .field("progress", &self.progress)
            .finish_non_exhaustive()
    }
}

impl UploadScheduler {
    /// Scheduler reading bytes from `library` and sending them over `transport`.
    pub fn new(library: Arc<dyn PhotoLibrary>, transport: Arc<dyn MediaTransport>) -> Self {
        Self {
            library,
            transport,
            progress: None,
        }
    }

    /// Also record every item on `progress`.
    pub fn with_progress(mut self, progress: UploadProgress) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Upload `items` with at most `max_concurrent` transport calls in flight.
    ///
    /// `on_item_done` fires exactly once per item, as soon as that item's
    /// outcome is known; calls may arrive in any order. A failing or
    /// panicking item counts as a failure and never stops the other workers.
    pub async fn run_uploads<F>(
        &self,
        items: &[PhotoDescriptor],
        max_concurrent: usize,
        on_item_done: F,
    ) -> BatchSummary
    where
        F: Fn(&str, OutcomeKind) + Send + Sync,
    {
        self.run_batch(items, max_concurrent, on_item_done).await.summary
    }

    /// Like [`UploadScheduler::run_uploads`], but keeps records and failure messages.
    #[instrument(skip(self, items, on_item_done), fields(items = items.len()))]
    pub async fn run_batch<F>(
        &self,
        items: &[PhotoDescriptor],
        max_concurrent: usize,
        on_item_done: F,
    ) -> UploadReport
    where
        F: Fn(&str, OutcomeKind) + Send + Sync,
    {
        let total = items.len();
        if total == 0 {
            return UploadReport::default();
        }

        let workers = max_concurrent.max(1).min(total);
        debug!(workers, "Starting upload workers");

        let cursor = AtomicUsize::new(0);
        let report = Mutex::new(UploadReport::default());

        let pool = (0..workers).map(|worker| {
            let cursor = &cursor;
            let report = &report;
            let on_item_done = &on_item_done;
            async move {
                loop {
                    let index = cursor.fetch_add(1, Ordering::SeqCst);
                    let Some(item) = items.get(index) else {
                        break;
                    };

                    if let Some(progress) = &self.progress {
                        progress.mark_uploading(&item.id);
                    }

                    let outcome = match AssertUnwindSafe(self.upload_one(item)).catch_unwind().await {
                        Ok(outcome) => outcome,
                        Err(panic) => {
                            let message = panic_message(panic.as_ref());
                            warn!(worker, id = %item.id, "Upload panicked: {}", message);
                            UploadOutcome::failure(message, 500)
                        }
                    };

                    if let Some(progress) = &self.progress {
                        progress.record(&item.id, &outcome);
                    }
                    let kind = outcome.kind();
                    if let Ok(mut report) = report.lock() {
                        report.record(&item.id, outcome);
                    }
                    on_item_done(&item.id, kind);
                }
            }
        });
        join_all(pool).await;

        let report = report.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner());
        info!(
            success = report.summary.success_count,
            failed = report.summary.fail_count,
            "Upload batch finished"
        );
        report
    }

    async fn upload_one(&self, item: &PhotoDescriptor) -> UploadOutcome {
        let Some(bytes) = self.library.read_photo_bytes(&item.source_uri).await else {
            warn!(id = %item.id, uri = %item.source_uri, "Photo bytes unavailable");
            return UploadOutcome::failure("Image data not found", 404);
        };

        let file_name = if item.file_name.is_empty() {
            FALLBACK_FILE_NAME
        } else {
            item.file_name.as_str()
        };
        let content_type = ContentType::for_file_name(file_name);

        let outcome = self
            .transport
            .upload(bytes, file_name, content_type.as_str())
            .await;
        if let UploadOutcome::Error { message, code } = &outcome {
            warn!(id = %item.id, code, "Upload failed: {}", message);
        }
        outcome
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        (*text).to_string()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "Upload failed unexpectedly".to_string()
    }
}
