//! Device photo descriptors.

use serde::{Deserialize, Serialize};

/// Metadata record for one on-device photo.
///
/// Produced by the media source; never mutated afterwards. Identity is `id`,
/// which is used for selection and for de-duplicating overlapping pages.
///
/// # Examples
///
/// ```
/// use picsync_core::PhotoDescriptor;
///
/// let photo = PhotoDescriptor::new("p1", "file:///sdcard/DCIM/a.jpg", "a.jpg", 2048);
/// assert_eq!(photo.file_name, "a.jpg");
/// assert_eq!(photo.extension(), Some("jpg"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PhotoDescriptor {
    /// Stable identifier within a session
    pub id: String,
    /// Where the host can read the photo bytes from
    pub source_uri: String,
    /// File name as shown on the device; matched against server records
    pub file_name: String,
    /// Size of the photo in bytes
    pub size_bytes: u64,
}

impl PhotoDescriptor {
    /// Create a new descriptor.
    pub fn new(
        id: impl Into<String>,
        source_uri: impl Into<String>,
        file_name: impl Into<String>,
        size_bytes: u64,
    ) -> Self {
        Self {
            id: id.into(),
            source_uri: source_uri.into(),
            file_name: file_name.into(),
            size_bytes,
        }
    }

    /// File extension of `file_name`, if any.
    pub fn extension(&self) -> Option<&str> {
        self.file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .filter(|ext| !ext.is_empty())
    }
}
