//! In-memory photo library for tests and demos.

use crate::PhotoLibrary;
use picsync_core::PhotoDescriptor;
use picsync_error::{HostError, HostErrorKind, PicsyncResult};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

/// Photo library holding descriptors and bytes in memory.
///
/// The photo list can be replaced at any time to simulate the device store
/// changing underneath a paging screen, and the library can be switched into
/// a failing mode to simulate host errors.
#[derive(Default)]
pub struct InMemoryPhotoLibrary {
    photos: RwLock<Vec<PhotoDescriptor>>,
    bytes: RwLock<HashMap<String, Vec<u8>>>,
    failing: AtomicBool,
}

impl InMemoryPhotoLibrary {
    /// Empty library.
    pub fn new() -> Self {
        Self::default()
    }

    /// Library whose photos each have `size_bytes` zero bytes of content.
    pub fn with_photos(photos: Vec<PhotoDescriptor>) -> Self {
        let bytes = photos
            .iter()
            .map(|p| (p.source_uri.clone(), vec![0u8; p.size_bytes as usize]))
            .collect();
        Self {
            photos: RwLock::new(photos),
            bytes: RwLock::new(bytes),
            failing: AtomicBool::new(false),
        }
    }

    /// Replace the photo list, keeping stored bytes.
    pub fn set_photos(&self, photos: Vec<PhotoDescriptor>) {
        if let Ok(mut slot) = self.photos.write() {
            *slot = photos;
        }
    }

    /// Store the bytes served for `source_uri`.
    pub fn insert_bytes(&self, source_uri: impl Into<String>, data: Vec<u8>) {
        if let Ok(mut bytes) = self.bytes.write() {
            bytes.insert(source_uri.into(), data);
        }
    }

    /// Forget the bytes for `source_uri`, making reads return `None`.
    pub fn remove_bytes(&self, source_uri: &str) {
        if let Ok(mut bytes) = self.bytes.write() {
            bytes.remove(source_uri);
        }
    }

    /// Make listing and counting fail until switched back.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> PicsyncResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(HostError::new(HostErrorKind::Enumeration(
                "photo store unavailable".to_string(),
            ))
            .into());
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl PhotoLibrary for InMemoryPhotoLibrary {
    async fn list_photos(
        &self,
        limit: usize,
        offset: usize,
    ) -> PicsyncResult<Vec<PhotoDescriptor>> {
        self.check()?;
        let photos = self.photos.read().map_err(|e| {
            HostError::new(HostErrorKind::Enumeration(e.to_string()))
        })?;
        Ok(photos.iter().skip(offset).take(limit).cloned().collect())
    }

    async fn count_photos(&self) -> PicsyncResult<usize> {
        self.check()?;
        let photos = self.photos.read().map_err(|e| {
            HostError::new(HostErrorKind::Enumeration(e.to_string()))
        })?;
        Ok(photos.len())
    }

    async fn read_photo_bytes(&self, source_uri: &str) -> Option<Vec<u8>> {
        self.bytes.read().ok()?.get(source_uri).cloned()
    }
}
