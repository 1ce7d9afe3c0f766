//! Gallery screen state machine.
//!
//! `Idle` (a page loaded) ⇄ `SelectionActive(upload | delete)`. The screen
//! owns paging, selection, the shared "uploading" flag and the status
//! banner. Background auto-uploads run on a spawned task and report back
//! through the screen's event channel.

use crate::{
    reconcile_or_degrade, PaginationState, SelectionMode, SelectionSet, UploadProgress, UploadReport,
    UploadScheduler,
};
use picsync_client::MediaTransport;
use picsync_config::SettingsStore;
use picsync_core::{
    BatchSummary, DeleteOutcome, GalleryItem, OutcomeKind, PhotoDescriptor, StatusMessage,
    UploadedMediaRecord,
};
use picsync_error::{PicsyncResult, StateError, StateErrorKind};
use picsync_host::MediaSourceAdapter;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

/// Banner text shown when the server rejects the session.
pub const SESSION_EXPIRED: &str = "Session expired";

/// What a tap or long-press did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TapEffect {
    /// Not selecting: the caller should open the item's upload/detail view
    OpenDetail(String),
    /// Selection mode started with this item
    SelectionStarted(SelectionMode),
    /// The item joined or left the selection
    Toggled,
    /// Nothing changed
    Ignored,
}

/// Work finished off the screen's own task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenEvent {
    /// One background upload item finished
    ItemDone {
        /// Photo id
        id: String,
        /// How it went
        kind: OutcomeKind,
    },
    /// A background auto-upload batch finished
    AutoUploadFinished(UploadReport),
}

/// Clears the shared uploading flag when dropped.
struct UploadingGuard(Arc<AtomicBool>);

impl UploadingGuard {
    fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| Self(Arc::clone(flag)))
    }
}

impl Drop for UploadingGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Local gallery with upload status, selection and batch actions.
pub struct GalleryScreen {
    source: MediaSourceAdapter,
    transport: Arc<dyn MediaTransport>,
    settings: SettingsStore,
    pagination: PaginationState,
    selection: SelectionSet,
    server_records: PicsyncResult<Vec<UploadedMediaRecord>>,
    uploading: Arc<AtomicBool>,
    auto_pending: bool,
    progress: UploadProgress,
    status: Option<StatusMessage>,
    events_tx: mpsc::UnboundedSender<ScreenEvent>,
    events_rx: mpsc::UnboundedReceiver<ScreenEvent>,
}

impl std::fmt::Debug for GalleryScreen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GalleryScreen")
            .field("pagination", &self.pagination)
            .field("selection", &self.selection)
            .field("uploading", &self.is_uploading())
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

impl GalleryScreen {
    /// Screen over its collaborators, loading `page_size` photos at a time.
    pub fn new(
        source: MediaSourceAdapter,
        transport: Arc<dyn MediaTransport>,
        settings: SettingsStore,
        page_size: usize,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            source,
            transport,
            settings,
            pagination: PaginationState::new(page_size),
            selection: SelectionSet::new(),
            server_records: Ok(Vec::new()),
            uploading: Arc::new(AtomicBool::new(false)),
            auto_pending: false,
            progress: UploadProgress::new(),
            status: None,
            events_tx,
            events_rx,
        }
    }

    /// Loaded items in display order.
    pub fn items(&self) -> &[GalleryItem] {
        self.pagination.loaded_items()
    }

    /// Paging state.
    pub fn pagination(&self) -> &PaginationState {
        &self.pagination
    }

    /// Current selection.
    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    /// Per-item upload board.
    pub fn progress(&self) -> &UploadProgress {
        &self.progress
    }

    /// Current status banner.
    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    /// Dismiss the status banner.
    pub fn clear_status(&mut self) {
        self.status = None;
    }

    /// Whether a manual or background upload is running.
    pub fn is_uploading(&self) -> bool {
        self.uploading.load(Ordering::SeqCst)
    }

    /// Reset paging and load the first page.
    pub async fn load_initial(&mut self) -> usize {
        self.refresh().await
    }

    /// Reset paging, refetch server records and load the first page.
    #[instrument(skip(self))]
    pub async fn refresh(&mut self) -> usize {
        self.pagination.reset();
        self.fetch_server_records().await;
        self.load_page().await
    }

    /// Append the next page if not already loading and more remain.
    #[instrument(skip(self))]
    pub async fn load_more(&mut self) -> usize {
        if !self.pagination.can_load_more() {
            debug!("Load more ignored");
            return 0;
        }
        self.load_page().await
    }

    async fn load_page(&mut self) -> usize {
        self.pagination.begin_load();
        let limit = *self.pagination.page_size();
        let offset = *self.pagination.current_offset();

        let page = self.source.list_photos(limit, offset).await;
        let total = self.source.count_photos().await;
        if let Some(error) = self.source.take_error() {
            self.status = Some(StatusMessage::error(format!("Failed to load photos: {}", error)));
        }

        let fresh = self.pagination.unseen(&page);
        let added = fresh.len();
        let items = reconcile_or_degrade(&fresh, &self.server_records);
        self.pagination.apply_page(page.len(), items, total);

        debug!(fetched = page.len(), added, offset, total, "Loaded page");
        added
    }

    /// Refetch server records; a failed fetch leaves nothing marked uploaded.
    async fn fetch_server_records(&mut self) {
        self.server_records = self.transport.list_media().await;
        if let Err(e) = &self.server_records {
            warn!(error = %e, "Could not fetch server records");
            if e.is_unauthorized() {
                self.status = Some(StatusMessage::error(SESSION_EXPIRED));
            }
        }
    }

    /// Recompute upload status of the loaded items without touching paging.
    fn reconcile_loaded(&mut self) {
        let photos = self.pagination.loaded_photos();
        let items = reconcile_or_degrade(&photos, &self.server_records);
        self.pagination.replace_items(items);
    }

    /// Tap on an item.
    pub fn tap(&mut self, id: &str) -> TapEffect {
        let Some(item) = self.pagination.item(id) else {
            return TapEffect::Ignored;
        };
        if !self.selection.is_active() {
            return TapEffect::OpenDetail(id.to_string());
        }
        if self.selection.toggle(item) {
            TapEffect::Toggled
        } else {
            TapEffect::Ignored
        }
    }

    /// Long-press on an item: starts selection mode, or toggles while selecting.
    pub fn long_press(&mut self, id: &str) -> TapEffect {
        let Some(item) = self.pagination.item(id) else {
            return TapEffect::Ignored;
        };
        if self.selection.is_active() {
            return if self.selection.toggle(item) {
                TapEffect::Toggled
            } else {
                TapEffect::Ignored
            };
        }
        self.selection.insert(item);
        TapEffect::SelectionStarted(SelectionMode::for_item(item))
    }

    /// Leave selection mode and dismiss the banner.
    pub fn cancel_selection(&mut self) {
        self.selection.clear();
        self.status = None;
    }

    fn require_mode(&mut self, mode: SelectionMode) -> PicsyncResult<()> {
        if self.selection.is_empty() {
            return Err(StateError::new(StateErrorKind::EmptySelection).into());
        }
        if self.selection.mode() != Some(mode) {
            return Err(StateError::new(StateErrorKind::InvalidMode(mode.to_string())).into());
        }
        Ok(())
    }

    fn busy(&mut self) -> PicsyncResult<BatchSummary> {
        self.status = Some(StatusMessage::info("An upload is already in progress"));
        Err(StateError::new(StateErrorKind::Busy).into())
    }

    fn scheduler(&self) -> UploadScheduler {
        UploadScheduler::new(Arc::clone(self.source.library()), Arc::clone(&self.transport))
            .with_progress(self.progress.clone())
    }

    /// Upload the selected photos, then reconcile, clear the selection and summarise.
    ///
    /// # Errors
    ///
    /// Refused when the selection is empty, not in upload mode, or an
    /// upload is already running.
    #[instrument(skip(self), fields(selected = self.selection.len()))]
    pub async fn upload_selected(&mut self) -> PicsyncResult<BatchSummary> {
        self.require_mode(SelectionMode::Upload)?;
        let Some(guard) = UploadingGuard::acquire(&self.uploading) else {
            return self.busy();
        };

        let photos: Vec<PhotoDescriptor> = self
            .selection
            .ids()
            .iter()
            .filter_map(|id| self.pagination.item(id))
            .filter(|item| !item.is_uploaded)
            .map(|item| item.photo.clone())
            .collect();

        let concurrency = *self.settings.load_upload_settings().max_parallel_uploads() as usize;
        let report = self.scheduler().run_batch(&photos, concurrency, |_, _| {}).await;
        drop(guard);

        self.finish_upload(report, true).await
    }

    /// Upload again every loaded photo whose last attempt failed.
    ///
    /// # Errors
    ///
    /// Refused while another upload is running.
    #[instrument(skip(self))]
    pub async fn retry_failed(&mut self) -> PicsyncResult<BatchSummary> {
        let failed: HashSet<String> = self.progress.failed_ids().into_iter().collect();
        let photos: Vec<PhotoDescriptor> = self
            .items()
            .iter()
            .filter(|item| !item.is_uploaded && failed.contains(item.id()))
            .map(|item| item.photo.clone())
            .collect();

        if photos.is_empty() {
            self.status = Some(StatusMessage::info("Nothing to retry"));
            return Ok(BatchSummary::default());
        }
        let Some(guard) = UploadingGuard::acquire(&self.uploading) else {
            return self.busy();
        };

        info!(count = photos.len(), "Retrying failed uploads");
        let concurrency = *self.settings.load_upload_settings().max_parallel_uploads() as usize;
        let report = self.scheduler().run_batch(&photos, concurrency, |_, _| {}).await;
        drop(guard);

        self.finish_upload(report, false).await
    }

    async fn finish_upload(&mut self, report: UploadReport, clear_selection: bool) -> PicsyncResult<BatchSummary> {
        let uploaded = report.records.clone();
        self.fetch_server_records().await;
        self.merge_records(uploaded);
        self.reconcile_loaded();

        if clear_selection {
            self.selection.clear();
        }
        self.status = Some(Self::upload_message(&report));
        Ok(report.summary)
    }

    /// Add records returned by this session's uploads to the known set.
    ///
    /// After a failed fetch the known set becomes exactly these records.
    fn merge_records(&mut self, records: Vec<UploadedMediaRecord>) {
        if let Ok(known) = &mut self.server_records {
            for record in records {
                if !known.iter().any(|existing| existing.id == record.id) {
                    known.push(record);
                }
            }
            return;
        }
        if !records.is_empty() {
            self.server_records = Ok(records);
        }
    }

    fn upload_message(report: &UploadReport) -> StatusMessage {
        if report.auth_expired {
            StatusMessage::error(SESSION_EXPIRED)
        } else {
            StatusMessage::for_batch(&report.summary, "uploaded")
        }
    }

    /// Delete the selected server records one at a time.
    ///
    /// # Errors
    ///
    /// Refused when the selection is empty, not in delete mode, or an
    /// upload is running.
    #[instrument(skip(self), fields(selected = self.selection.len()))]
    pub async fn delete_selected(&mut self) -> PicsyncResult<BatchSummary> {
        self.require_mode(SelectionMode::Delete)?;
        if self.is_uploading() {
            return self.busy();
        }

        let targets: Vec<(String, Option<String>)> = self
            .selection
            .ids()
            .iter()
            .map(|id| {
                let record_id = self
                    .pagination
                    .item(id)
                    .and_then(|item| item.uploaded_record_id.clone());
                (id.clone(), record_id)
            })
            .collect();

        let mut summary = BatchSummary::default();
        let mut auth_expired = false;
        let mut deleted_ids: HashSet<String> = HashSet::new();

        for (id, record_id) in targets {
            let outcome = match record_id {
                Some(record_id) => self.transport.delete_media(&record_id).await,
                None => DeleteOutcome::failure("Image is not on the server", 404),
            };
            summary.record(outcome.kind());
            match outcome {
                DeleteOutcome::Success { deleted } => {
                    debug!(id = %id, record = %deleted.id(), "Deleted");
                    deleted_ids.insert(deleted.id().clone());
                }
                DeleteOutcome::Error { message, code } => {
                    warn!(id = %id, code, "Delete failed: {}", message);
                    auth_expired |= code == 401;
                }
            }
        }

        self.fetch_server_records().await;
        if let Ok(known) = &mut self.server_records {
            known.retain(|record| !deleted_ids.contains(&record.id));
        }
        self.reconcile_loaded();
        self.selection.clear();

        self.status = Some(if auth_expired {
            StatusMessage::error(SESSION_EXPIRED)
        } else {
            StatusMessage::for_batch(&summary, "deleted")
        });
        info!(
            success = summary.success_count,
            failed = summary.fail_count,
            "Delete batch finished"
        );
        Ok(summary)
    }

    /// Start a background upload of loaded, not-yet-uploaded photos.
    ///
    /// Runs only when auto-upload is on, nothing is selected, no upload is
    /// running and there is something to send. Returns immediately; the
    /// result arrives as [`ScreenEvent::AutoUploadFinished`]. Must be called
    /// inside a tokio runtime.
    #[instrument(skip(self))]
    pub fn trigger_auto_upload(&mut self) -> bool {
        let settings = self.settings.load_upload_settings();
        if !*settings.auto_upload() || self.selection.is_active() {
            return false;
        }

        let photos: Vec<PhotoDescriptor> = self
            .items()
            .iter()
            .filter(|item| !item.is_uploaded)
            .map(|item| item.photo.clone())
            .collect();
        if photos.is_empty() {
            return false;
        }

        let Some(guard) = UploadingGuard::acquire(&self.uploading) else {
            debug!("Auto-upload skipped, upload already running");
            return false;
        };

        let concurrency = settings.effective_auto_upload_concurrency();
        let scheduler = self.scheduler();
        let events = self.events_tx.clone();
        info!(count = photos.len(), concurrency, "Starting auto-upload");

        self.auto_pending = true;
        tokio::spawn(async move {
            let item_events = events.clone();
            let report = scheduler
                .run_batch(&photos, concurrency, move |id, kind| {
                    let _ = item_events.send(ScreenEvent::ItemDone {
                        id: id.to_string(),
                        kind,
                    });
                })
                .await;
            drop(guard);
            if events.send(ScreenEvent::AutoUploadFinished(report)).is_err() {
                debug!("Screen gone before auto-upload finished");
            }
        });
        true
    }

    /// Apply a background event to the screen.
    ///
    /// Returns the batch summary when the event finished an auto-upload.
    pub fn handle_event(&mut self, event: ScreenEvent) -> Option<BatchSummary> {
        match event {
            ScreenEvent::ItemDone { id, kind } => {
                debug!(id = %id, %kind, "Auto-upload item done");
                None
            }
            ScreenEvent::AutoUploadFinished(report) => {
                self.auto_pending = false;
                self.merge_records(report.records.clone());
                self.reconcile_loaded();
                self.status = Some(Self::upload_message(&report));
                Some(report.summary)
            }
        }
    }

    /// Next background event, waiting for one.
    pub async fn next_event(&mut self) -> Option<ScreenEvent> {
        self.events_rx.recv().await
    }

    /// Whether a started auto-upload has not been applied yet.
    pub fn auto_upload_pending(&self) -> bool {
        self.auto_pending
    }

    /// Apply events until the running auto-upload finishes.
    ///
    /// Returns `None` at once when no auto-upload was started.
    pub async fn wait_for_auto_upload(&mut self) -> Option<BatchSummary> {
        if !self.auto_pending {
            return None;
        }
        while let Some(event) = self.next_event().await {
            if let Some(summary) = self.handle_event(event) {
                return Some(summary);
            }
        }
        None
    }
}
