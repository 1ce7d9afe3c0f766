//! Media Source Adapter.
//!
//! Wraps a [`PhotoLibrary`] so that page loading never fails: host errors
//! become empty pages. The first failure is kept so the screen can show it.

use crate::PhotoLibrary;
use picsync_core::PhotoDescriptor;
use std::sync::{Arc, Mutex};
use tracing::{debug, instrument, warn};

/// Infallible view over the device photo store.
#[derive(Clone)]
pub struct MediaSourceAdapter {
    library: Arc<dyn PhotoLibrary>,
    first_error: Arc<Mutex<Option<String>>>,
}

impl MediaSourceAdapter {
    /// Wrap a photo library.
    pub fn new(library: Arc<dyn PhotoLibrary>) -> Self {
        Self {
            library,
            first_error: Arc::new(Mutex::new(None)),
        }
    }

    /// The wrapped library, for reading photo bytes.
    pub fn library(&self) -> &Arc<dyn PhotoLibrary> {
        &self.library
    }

    /// Return at most `limit` photos starting at `offset`.
    ///
    /// A zero `limit` returns an empty page without asking the host. Host
    /// failures are logged and yield an empty page.
    #[instrument(skip(self))]
    pub async fn list_photos(&self, limit: usize, offset: usize) -> Vec<PhotoDescriptor> {
        if limit == 0 {
            return Vec::new();
        }

        match self.library.list_photos(limit, offset).await {
            Ok(mut photos) => {
                photos.truncate(limit);
                debug!(count = photos.len(), "Listed device photos");
                photos
            }
            Err(e) => {
                warn!(error = %e, "Listing device photos failed");
                self.remember(e.to_string());
                Vec::new()
            }
        }
    }

    /// Total number of photos, or zero if the host cannot say.
    #[instrument(skip(self))]
    pub async fn count_photos(&self) -> usize {
        match self.library.count_photos().await {
            Ok(count) => count,
            Err(e) => {
                warn!(error = %e, "Counting device photos failed");
                self.remember(e.to_string());
                0
            }
        }
    }

    /// Take the first host failure recorded since the last call.
    pub fn take_error(&self) -> Option<String> {
        self.first_error.lock().ok().and_then(|mut slot| slot.take())
    }

    fn remember(&self, message: String) {
        if let Ok(mut slot) = self.first_error.lock() {
            if slot.is_none() {
                *slot = Some(message);
            }
        }
    }
}
