//! Device photo store trait.

use picsync_core::PhotoDescriptor;
use picsync_error::PicsyncResult;

/// The host's device photo store.
///
/// Implementations return photos in a host-defined order that is stable
/// within a session as long as the underlying store does not change.
#[async_trait::async_trait]
pub trait PhotoLibrary: Send + Sync {
    /// Return at most `limit` photos starting at `offset`.
    async fn list_photos(&self, limit: usize, offset: usize)
    -> PicsyncResult<Vec<PhotoDescriptor>>;

    /// Total number of photos in the store.
    async fn count_photos(&self) -> PicsyncResult<usize>;

    /// Raw bytes of the photo at `source_uri`, or `None` if they cannot be read.
    async fn read_photo_bytes(&self, source_uri: &str) -> Option<Vec<u8>>;
}
