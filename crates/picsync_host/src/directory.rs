//! Directory-backed photo library.
//!
//! Desktop stand-in for the device camera roll: every image file below a
//! root directory is a photo.

use crate::PhotoLibrary;
use picsync_core::{ContentType, PhotoDescriptor};
use picsync_error::{HostError, HostErrorKind, PicsyncResult};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use walkdir::WalkDir;

/// Photo library over a directory tree.
///
/// Photos are ordered by path so pages are stable while the directory is
/// unchanged. The descriptor id and source URI are both the file path,
/// which keeps ids stable across pages and across sessions.
///
/// # Example Structure
///
/// ```text
/// ~/Pictures/
/// ├── 2024/
/// │   ├── IMG_0001.jpg
/// │   └── IMG_0002.heic
/// └── screenshot.png
/// ```
///
/// The directory is walked once per listing from offset zero; later pages
/// and counts reuse that snapshot.
pub struct DirectoryPhotoLibrary {
    root: PathBuf,
    canonical_root: PathBuf,
    snapshot: RwLock<Option<Arc<Vec<PhotoDescriptor>>>>,
}

impl DirectoryPhotoLibrary {
    /// Create a library rooted at `root`.
    ///
    /// # Errors
    ///
    /// Returns error if `root` is not an existing directory.
    #[tracing::instrument(skip(root))]
    pub fn new(root: impl Into<PathBuf>) -> PicsyncResult<Self> {
        let root = root.into();

        if !root.is_dir() {
            return Err(HostError::new(HostErrorKind::Enumeration(format!(
                "{} is not a directory",
                root.display()
            )))
            .into());
        }

        let canonical_root = std::fs::canonicalize(&root).map_err(|e| {
            HostError::new(HostErrorKind::Enumeration(format!("{}: {}", root.display(), e)))
        })?;

        tracing::info!(path = %root.display(), "Opened photo directory");
        Ok(Self {
            root,
            canonical_root,
            snapshot: RwLock::new(None),
        })
    }

    /// Root directory of the library.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn is_photo(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(ContentType::from_extension)
            .is_some()
    }

    fn scan(root: &Path) -> Result<Vec<PhotoDescriptor>, HostError> {
        let mut photos = Vec::new();

        for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                HostError::new(HostErrorKind::Enumeration(format!("{}: {}", root.display(), e)))
            })?;

            if !entry.file_type().is_file() || !Self::is_photo(entry.path()) {
                continue;
            }

            let size_bytes = entry.metadata().map(|m| m.len()).unwrap_or(0);
            let path = entry.path().to_string_lossy().to_string();
            let file_name = entry.file_name().to_string_lossy().to_string();

            photos.push(PhotoDescriptor::new(path.clone(), path, file_name, size_bytes));
        }

        Ok(photos)
    }

    /// Walk the directory again and replace the snapshot.
    #[tracing::instrument(skip(self), fields(root = %self.root.display()))]
    pub async fn rescan(&self) -> PicsyncResult<Arc<Vec<PhotoDescriptor>>> {
        let root = self.root.clone();
        let photos = tokio::task::spawn_blocking(move || Self::scan(&root))
            .await
            .map_err(|e| HostError::new(HostErrorKind::Enumeration(e.to_string())))??;

        let photos = Arc::new(photos);
        *self.snapshot.write().await = Some(Arc::clone(&photos));
        tracing::debug!(count = photos.len(), "Scanned photo directory");
        Ok(photos)
    }

    async fn cached(&self) -> PicsyncResult<Arc<Vec<PhotoDescriptor>>> {
        if let Some(photos) = self.snapshot.read().await.as_ref() {
            return Ok(Arc::clone(photos));
        }
        self.rescan().await
    }
}

#[async_trait::async_trait]
impl PhotoLibrary for DirectoryPhotoLibrary {
    #[tracing::instrument(skip(self), fields(root = %self.root.display()))]
    async fn list_photos(
        &self,
        limit: usize,
        offset: usize,
    ) -> PicsyncResult<Vec<PhotoDescriptor>> {
        let photos = if offset == 0 {
            self.rescan().await?
        } else {
            self.cached().await?
        };
        Ok(photos.iter().skip(offset).take(limit).cloned().collect())
    }

    #[tracing::instrument(skip(self), fields(root = %self.root.display()))]
    async fn count_photos(&self) -> PicsyncResult<usize> {
        Ok(self.cached().await?.len())
    }

    #[tracing::instrument(skip(self))]
    async fn read_photo_bytes(&self, source_uri: &str) -> Option<Vec<u8>> {
        let path = match tokio::fs::canonicalize(source_uri).await {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!(error = %e, "Photo bytes unavailable");
                return None;
            }
        };

        if !path.starts_with(&self.canonical_root) {
            tracing::warn!("Refusing to read photo outside the library root");
            return None;
        }

        match tokio::fs::read(&path).await {
            Ok(data) => {
                tracing::debug!(size = data.len(), "Read photo bytes");
                Some(data)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Photo bytes unavailable");
                None
            }
        }
    }
}
