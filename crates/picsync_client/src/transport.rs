//! The remote media operations the orchestration layer depends on.

use async_trait::async_trait;
use picsync_core::{DeleteOutcome, UploadOutcome, UploadedMediaRecord};
use picsync_error::PicsyncResult;

/// Remote media server as seen by the scheduler and the gallery screen.
///
/// Uploads and deletes report failures as outcome values; only the listing
/// returns an error, which callers degrade to "nothing uploaded".
#[async_trait]
pub trait MediaTransport: Send + Sync {
    /// Upload one file.
    async fn upload(&self, bytes: Vec<u8>, file_name: &str, content_type: &str) -> UploadOutcome;

    /// Every record the server holds for the current user.
    async fn list_media(&self) -> PicsyncResult<Vec<UploadedMediaRecord>>;

    /// Delete one server record.
    async fn delete_media(&self, id: &str) -> DeleteOutcome;
}
